//! Chunk columns: block storage, heightmap, light, and neighbour tracking.

pub mod blocks;
mod light;
pub mod neighbours;
pub mod section;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use lumen_registry::BlockRegistry;
use lumen_utils::locks::{SyncMutex, SyncRwLock};
use lumen_utils::{ChunkPos, Direction};

use crate::chunk::neighbours::NeighbourSet;
use crate::chunk::section::ChunkSection;
use crate::config::DimensionLight;
use crate::events::LightEvents;
use crate::light::BorderLight;

/// Edge length of a section in voxels.
pub const SECTION_SIZE: usize = 16;
/// Voxels per section.
pub const BLOCKS_PER_SECTION: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;
/// Columns per chunk.
pub const COLUMNS_PER_CHUNK: usize = SECTION_SIZE * SECTION_SIZE;

/// Heightmap sentinel: the column is open to the sky all the way down.
pub const HEIGHT_OPEN: i32 = i32::MIN;
/// Heightmap sentinel: skylight never reaches the column (skyless dimension).
pub const HEIGHT_NEVER: i32 = i32::MAX;

#[inline]
pub(crate) fn block_index(x: u8, y: i32, z: u8) -> usize {
    ((y & 15) as usize) << 8 | usize::from(z) << 4 | usize::from(x)
}

#[inline]
pub(crate) fn column_index(x: u8, z: u8) -> usize {
    usize::from(z) << 4 | usize::from(x)
}

/// Everything guarded by the chunk's lock: the section array, the column
/// heightmap, and the bottom border light layer.
#[derive(Debug)]
pub struct ChunkData {
    min_section: i32,
    sections: Vec<Option<ChunkSection>>,
    heightmap: [i32; COLUMNS_PER_CHUNK],
    bottom: BorderLight,
}

impl ChunkData {
    fn new(min_section: i32, max_section: i32, can_skylight: bool) -> Self {
        let count = (max_section - min_section + 1) as usize;
        let initial = if can_skylight { HEIGHT_OPEN } else { HEIGHT_NEVER };
        Self {
            min_section,
            sections: (0..count).map(|_| None).collect(),
            heightmap: [initial; COLUMNS_PER_CHUNK],
            bottom: BorderLight::new(),
        }
    }

    fn index(&self, section_height: i32) -> Option<usize> {
        let index = section_height.checked_sub(self.min_section)?;
        if index < 0 || index as usize >= self.sections.len() {
            return None;
        }
        Some(index as usize)
    }

    pub(crate) fn section(&self, section_height: i32) -> Option<&ChunkSection> {
        self.sections.get(self.index(section_height)?)?.as_ref()
    }

    pub(crate) fn section_mut(&mut self, section_height: i32) -> Option<&mut ChunkSection> {
        let index = self.index(section_height)?;
        self.sections.get_mut(index)?.as_mut()
    }

    /// Creates the section when absent. Out-of-range heights yield `None`.
    pub(crate) fn get_or_create_section(
        &mut self,
        section_height: i32,
    ) -> Option<&mut ChunkSection> {
        let index = self.index(section_height)?;
        let slot = self.sections.get_mut(index)?;
        Some(slot.get_or_insert_with(ChunkSection::new))
    }

    pub(crate) fn height(&self, column: usize) -> i32 {
        self.heightmap[column]
    }
}

/// One chunk column.
///
/// All mutation of a chunk's own sections and heightmap happens under its
/// `data` lock; no operation ever holds two chunks' data locks at once.
/// Neighbour state is read through snapshots taken one lock at a time.
pub struct Chunk {
    pos: ChunkPos,
    min_section: i32,
    max_section: i32,
    dimension: DimensionLight,
    registry: Arc<BlockRegistry>,
    events: Arc<dyn LightEvents>,
    occlusion_revision: Arc<AtomicU64>,
    pub(crate) data: SyncRwLock<ChunkData>,
    pub(crate) neighbours: SyncMutex<NeighbourSet>,
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("min_section", &self.min_section)
            .field("max_section", &self.max_section)
            .finish_non_exhaustive()
    }
}

impl Chunk {
    pub(crate) fn new(
        pos: ChunkPos,
        min_section: i32,
        max_section: i32,
        dimension: DimensionLight,
        registry: Arc<BlockRegistry>,
        events: Arc<dyn LightEvents>,
        occlusion_revision: Arc<AtomicU64>,
    ) -> Self {
        debug_assert!(min_section <= max_section);
        let can_skylight = dimension.can_skylight();
        Self {
            pos,
            min_section,
            max_section,
            dimension,
            registry,
            events,
            occlusion_revision,
            data: SyncRwLock::new(ChunkData::new(min_section, max_section, can_skylight)),
            neighbours: SyncMutex::new(NeighbourSet::default()),
        }
    }

    /// The chunk's position.
    #[must_use]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// The lowest section height of the chunk.
    #[must_use]
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// The highest section height of the chunk.
    #[must_use]
    pub fn max_section(&self) -> i32 {
        self.max_section
    }

    pub(crate) fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub(crate) fn events(&self) -> &Arc<dyn LightEvents> {
        &self.events
    }

    pub(crate) fn dimension(&self) -> DimensionLight {
        self.dimension
    }

    /// Returns whether skylight applies to this chunk.
    #[must_use]
    pub fn can_skylight(&self) -> bool {
        self.dimension.can_skylight()
    }

    /// The heightmap value of one column, [`HEIGHT_OPEN`] when the column is
    /// open to the sky.
    #[must_use]
    pub fn height_at(&self, x: u8, z: u8) -> i32 {
        debug_assert!(x < 16 && z < 16);
        self.data.read().height(column_index(x, z))
    }

    /// Returns whether a section exists at `section_height`.
    #[must_use]
    pub fn has_section(&self, section_height: i32) -> bool {
        self.data.read().section(section_height).is_some()
    }

    /// Looks up the cached occlusion table of one section.
    ///
    /// Missing sections occlude nothing.
    #[must_use]
    pub fn is_occluded(&self, section_height: i32, from: Direction, to: Direction) -> bool {
        self.data
            .read()
            .section(section_height)
            .is_some_and(|section| section.occlusion.is_occluded(from, to))
    }

    pub(crate) fn bump_occlusion_revision(&self) {
        self.occlusion_revision
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
}
