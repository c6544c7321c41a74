//! The chunk map: sole owner of chunks and wiring point for their
//! neighbour sets.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lumen_registry::BlockRegistry;
use lumen_utils::locks::SyncRwLock;
use lumen_utils::{BlockPos, BlockStateId, ChunkPos};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::chunk::Chunk;
use crate::chunk::neighbours::NeighbourSet;
use crate::config::DimensionLight;
use crate::events::{LightEvents, NoopEvents};
use crate::light::LightCell;

/// A loaded dimension: the chunk map plus everything shared by its chunks.
pub struct World {
    registry: Arc<BlockRegistry>,
    dimension: DimensionLight,
    min_section: i32,
    max_section: i32,
    chunks: SyncRwLock<FxHashMap<ChunkPos, Arc<Chunk>>>,
    events: Arc<dyn LightEvents>,
    occlusion_revision: Arc<AtomicU64>,
}

impl World {
    /// Creates an empty world without an event sink.
    #[must_use]
    pub fn new(
        registry: Arc<BlockRegistry>,
        dimension: DimensionLight,
        min_section: i32,
        max_section: i32,
    ) -> Self {
        Self::with_events(
            registry,
            dimension,
            min_section,
            max_section,
            Arc::new(NoopEvents),
        )
    }

    /// Creates an empty world delivering light notifications to `events`.
    ///
    /// # Panics
    /// Panics when the section range is inverted.
    #[must_use]
    pub fn with_events(
        registry: Arc<BlockRegistry>,
        dimension: DimensionLight,
        min_section: i32,
        max_section: i32,
        events: Arc<dyn LightEvents>,
    ) -> Self {
        assert!(min_section <= max_section, "inverted section range");
        Self {
            registry,
            dimension,
            min_section,
            max_section,
            chunks: SyncRwLock::new(FxHashMap::default()),
            events,
            occlusion_revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The block registry this world resolves states against.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Looks up a loaded chunk.
    #[must_use]
    pub fn chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.chunks.read().get(&pos).cloned()
    }

    /// Creates (or returns) the chunk at `pos` and wires it into the
    /// neighbour sets of the surrounding chunks. Chunks whose neighbour set
    /// just completed run their initial light pass before this returns.
    pub fn create_chunk(&self, pos: ChunkPos) -> Arc<Chunk> {
        let mut completed: SmallVec<[Arc<Chunk>; 9]> = SmallVec::new();
        let chunk = {
            let mut chunks = self.chunks.write();
            if let Some(existing) = chunks.get(&pos) {
                return existing.clone();
            }
            let chunk = Arc::new(Chunk::new(
                pos,
                self.min_section,
                self.max_section,
                self.dimension,
                self.registry.clone(),
                self.events.clone(),
                self.occlusion_revision.clone(),
            ));
            for (slot, (dx, dz)) in NeighbourSet::OFFSETS.iter().enumerate() {
                let Some(neighbour) = chunks.get(&pos.offset(*dx, *dz)) else {
                    continue;
                };
                if chunk.neighbours.lock().set(slot, Arc::downgrade(neighbour)) {
                    completed.push(chunk.clone());
                }
                let Some(mirror) = NeighbourSet::index_of(-dx, -dz) else {
                    continue;
                };
                if neighbour.neighbours.lock().set(mirror, Arc::downgrade(&chunk)) {
                    completed.push(neighbour.clone());
                }
            }
            chunks.insert(pos, chunk.clone());
            chunk
        };
        // run completions outside the map lock; they take chunk data locks
        for chunk in completed {
            chunk.on_neighbours_complete();
        }
        chunk
    }

    /// Unloads a chunk and clears it from its neighbours' sets. Light the
    /// chunk propagated outward is left as is.
    pub fn remove_chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        let mut chunks = self.chunks.write();
        let chunk = chunks.remove(&pos)?;
        for (dx, dz) in NeighbourSet::OFFSETS {
            let Some(neighbour) = chunks.get(&pos.offset(dx, dz)) else {
                continue;
            };
            let Some(mirror) = NeighbourSet::index_of(-dx, -dz) else {
                continue;
            };
            neighbour.neighbours.lock().remove(mirror);
        }
        Some(chunk)
    }

    /// Places a block state, updating light and occlusion incrementally.
    ///
    /// # Returns
    /// `false` when the containing chunk is not loaded; the caller is
    /// expected to retry after loading it.
    pub fn set_block(&self, pos: BlockPos, state: BlockStateId) -> bool {
        let Some(chunk) = self.chunk(pos.chunk_pos()) else {
            return false;
        };
        chunk.set_block(pos.in_chunk_x(), pos.0.y, pos.in_chunk_z(), state);
        true
    }

    /// Reads the combined light of one voxel. Unloaded positions are dark.
    #[must_use]
    pub fn light_at(&self, pos: BlockPos) -> LightCell {
        self.chunk(pos.chunk_pos())
            .map_or(LightCell::EMPTY, |chunk| {
                chunk.light_at(pos.in_chunk_x(), pos.0.y, pos.in_chunk_z())
            })
    }

    /// Monotonic counter bumped whenever any section's occlusion table
    /// actually changes. Mesh builders compare it against their cached value.
    #[must_use]
    pub fn occlusion_revision(&self) -> u64 {
        self.occlusion_revision.load(Ordering::Relaxed)
    }

    /// Rebuilds heightmaps and light of every loaded chunk on the rayon
    /// pool, then runs a cross-chunk propagation pass. Used after bulk
    /// loading; fires no per-section notifications.
    pub fn relight_all(&self) {
        let chunks: Vec<Arc<Chunk>> = self.chunks.read().values().cloned().collect();
        log::debug!("relighting {} chunks", chunks.len());
        chunks.par_iter().for_each(|chunk| {
            chunk.recalculate_heightmap();
            chunk.recalculate_light(false);
        });
        chunks
            .par_iter()
            .for_each(|chunk| chunk.propagate_from_neighbours(false));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chunk::HEIGHT_OPEN;
    use crate::events::SectionLightUpdate;
    use lumen_registry::{BlockProperties, LightProperties};
    use lumen_utils::Direction;
    use lumen_utils::locks::SyncMutex;

    const MIN_SECTION: i32 = 0;
    const MAX_SECTION: i32 = 15;

    fn registry() -> Arc<BlockRegistry> {
        let mut registry = BlockRegistry::new();
        registry
            .register(BlockProperties {
                name: "stone".to_owned(),
                fully_opaque: true,
                light: LightProperties::OPAQUE,
            })
            .unwrap();
        registry
            .register(BlockProperties {
                name: "glowstone".to_owned(),
                fully_opaque: true,
                light: LightProperties {
                    emission: 15,
                    ..LightProperties::OPAQUE
                },
            })
            .unwrap();
        Arc::new(registry)
    }

    fn stone(world: &World) -> BlockStateId {
        world.registry().id_of("stone").unwrap()
    }

    fn glowstone(world: &World) -> BlockStateId {
        world.registry().id_of("glowstone").unwrap()
    }

    fn world() -> World {
        World::new(
            registry(),
            DimensionLight::default(),
            MIN_SECTION,
            MAX_SECTION,
        )
    }

    /// 3x3 grid around the origin so the centre chunk is fully neighboured.
    fn neighboured_world(world: &World) -> Arc<Chunk> {
        for dx in -1..=1 {
            for dz in -1..=1 {
                world.create_chunk(ChunkPos::new(dx, dz));
            }
        }
        world.chunk(ChunkPos::new(0, 0)).unwrap()
    }

    #[derive(Default)]
    struct RecordingEvents {
        updates: SyncMutex<Vec<SectionLightUpdate>>,
    }

    impl LightEvents for RecordingEvents {
        fn section_light_changed(&self, update: SectionLightUpdate) {
            self.updates.lock().push(update);
        }
    }

    #[test]
    fn empty_chunk_is_fully_sky_lit() {
        let world = world();
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        assert_eq!(chunk.height_at(3, 9), HEIGHT_OPEN);
        for y in [0, 64, 200, 255] {
            assert_eq!(world.light_at(BlockPos::new(8, y, 8)).sky(), 15);
        }
        // below and above the loaded range
        assert_eq!(world.light_at(BlockPos::new(8, -1, 8)).sky(), 15);
        assert_eq!(world.light_at(BlockPos::new(8, 256, 8)).sky(), 15);
    }

    #[test]
    fn opaque_block_shadows_its_column() {
        let world = world();
        let chunk = neighboured_world(&world);
        world.set_block(BlockPos::new(8, 64, 8), stone(&world));

        assert_eq!(chunk.height_at(8, 8), 65);
        assert_eq!(world.light_at(BlockPos::new(8, 65, 8)).sky(), 15);
        // the block itself is dark
        assert_eq!(world.light_at(BlockPos::new(8, 64, 8)).sky(), 0);
        // shadowed cell below, reachable sideways from the open neighbour
        // column one step away
        assert_eq!(world.light_at(BlockPos::new(8, 63, 8)).sky(), 14);
        // open columns next to the block stay at full sky
        assert_eq!(world.light_at(BlockPos::new(7, 63, 8)).sky(), 15);
    }

    #[test]
    fn removing_the_block_restores_full_sky() {
        let world = world();
        let chunk = neighboured_world(&world);
        world.set_block(BlockPos::new(8, 64, 8), stone(&world));
        world.set_block(BlockPos::new(8, 64, 8), BlockStateId::AIR);

        assert_eq!(chunk.height_at(8, 8), HEIGHT_OPEN);
        assert_eq!(world.light_at(BlockPos::new(8, 64, 8)).sky(), 15);
        assert_eq!(world.light_at(BlockPos::new(8, 63, 8)).sky(), 15);
    }

    #[test]
    fn completion_fires_no_notifications() {
        let events = Arc::new(RecordingEvents::default());
        let world = World::with_events(
            registry(),
            DimensionLight::default(),
            MIN_SECTION,
            MAX_SECTION,
            events.clone(),
        );
        neighboured_world(&world);
        assert!(events.updates.lock().is_empty());
    }

    #[test]
    fn block_change_fires_one_event_per_section() {
        let events = Arc::new(RecordingEvents::default());
        let world = World::with_events(
            registry(),
            DimensionLight::default(),
            MIN_SECTION,
            MAX_SECTION,
            events.clone(),
        );
        let chunk = neighboured_world(&world);
        world.set_block(BlockPos::new(8, 64, 8), stone(&world));
        assert!(chunk.has_section(4));
        assert!(!chunk.has_section(10));

        let updates = events.updates.lock();
        assert!(!updates.is_empty());
        // at most one event per section per pass
        let mut seen: Vec<i32> = updates.iter().map(|u| u.section_height).collect();
        seen.sort_unstable();
        let before = seen.len();
        seen.dedup();
        assert_eq!(seen.len(), before);
        // the changed section is reported as the origin
        assert!(
            updates
                .iter()
                .any(|u| u.section_height == 4 && u.own_chunk)
        );
    }

    #[test]
    fn emitter_light_attenuates_per_step() {
        let world = world();
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        world.set_block(BlockPos::new(8, 8, 8), glowstone(&world));

        assert_eq!(chunk.light_at(8, 8, 8).block(), 15);
        assert_eq!(chunk.light_at(9, 8, 8).block(), 14);
        assert_eq!(chunk.light_at(8, 12, 8).block(), 11);
        // manhattan distance 6
        assert_eq!(chunk.light_at(10, 10, 10).block(), 9);
        // sky light is unaffected below the emitter, spilling in sideways
        assert_eq!(chunk.light_at(8, 7, 8).sky(), 14);
    }

    #[test]
    fn removing_an_emitter_darkens_again() {
        let world = world();
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        world.set_block(BlockPos::new(8, 8, 8), glowstone(&world));
        world.set_block(BlockPos::new(8, 8, 8), BlockStateId::AIR);

        assert_eq!(chunk.light_at(8, 8, 8).block(), 0);
        assert_eq!(chunk.light_at(9, 8, 8).block(), 0);
    }

    #[test]
    fn skyless_dimension_has_no_sky_light() {
        let world = World::new(registry(), DimensionLight::NO_SKY, MIN_SECTION, MAX_SECTION);
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        world.set_block(BlockPos::new(8, 8, 8), glowstone(&world));

        assert_eq!(chunk.light_at(8, 20, 8).sky(), 0);
        assert_eq!(chunk.light_at(9, 8, 8).block(), 14);
        assert_eq!(chunk.light_at(8, 300, 8).sky(), 0);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let world = world();
        let chunk = neighboured_world(&world);
        world.set_block(BlockPos::new(8, 64, 8), stone(&world));
        world.set_block(BlockPos::new(9, 64, 8), stone(&world));
        world.set_block(BlockPos::new(5, 60, 5), glowstone(&world));

        let sample = |chunk: &Chunk| {
            let mut cells = Vec::new();
            for y in 56..72 {
                for z in 0..16 {
                    for x in 0..16 {
                        cells.push(chunk.light_at(x, y, z));
                    }
                }
            }
            cells
        };
        let first = sample(&chunk);
        chunk.recalculate_light(false);
        chunk.propagate_from_neighbours(false);
        assert_eq!(sample(&chunk), first);

        // a full reset followed by recomputation lands on the same state
        chunk.reset_light();
        chunk.recalculate_light(false);
        chunk.propagate_from_neighbours(false);
        assert_eq!(sample(&chunk), first);
    }

    #[test]
    fn relight_all_matches_incremental_state() {
        let world = world();
        let chunk = neighboured_world(&world);
        world.set_block(BlockPos::new(8, 64, 8), stone(&world));
        let before = world.light_at(BlockPos::new(8, 63, 8));
        world.relight_all();
        assert_eq!(world.light_at(BlockPos::new(8, 63, 8)), before);
        assert_eq!(chunk.height_at(8, 8), 65);
    }

    #[test]
    fn occlusion_revision_bumps_when_a_slab_splits_a_section() {
        let world = world();
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        let before = world.occlusion_revision();
        // a single block leaves the non-opaque space connected
        world.set_block(BlockPos::new(8, 8, 8), stone(&world));
        assert_eq!(world.occlusion_revision(), before);
        assert!(!chunk.is_occluded(0, Direction::Up, Direction::Down));
        // a full layer separates the top face from the bottom face
        for z in 0..16 {
            for x in 0..16 {
                world.set_block(BlockPos::new(x, 8, z), stone(&world));
            }
        }
        assert!(world.occlusion_revision() > before);
        assert!(chunk.is_occluded(0, Direction::Up, Direction::Down));
        assert!(!chunk.is_occluded(0, Direction::North, Direction::South));
    }

    #[test]
    fn set_block_in_unloaded_chunk_is_deferred() {
        let world = world();
        assert!(!world.set_block(BlockPos::new(8, 8, 8), BlockStateId(1)));
        assert_eq!(world.light_at(BlockPos::new(8, 8, 8)), LightCell::EMPTY);
    }

    #[test]
    fn removing_a_chunk_unwires_neighbours() {
        let world = world();
        let centre = neighboured_world(&world);
        assert!(centre.neighbours.lock().is_complete());
        world.remove_chunk(ChunkPos::new(1, 0));
        assert!(!centre.neighbours.lock().is_complete());
        assert!(world.chunk(ChunkPos::new(1, 0)).is_none());
    }

    #[test]
    #[should_panic(expected = "section height")]
    fn out_of_range_height_panics() {
        let world = world();
        let chunk = world.create_chunk(ChunkPos::new(0, 0));
        chunk.set_block(0, -1, 0, BlockStateId(1));
    }
}
