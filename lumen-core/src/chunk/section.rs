use crate::chunk::blocks::SectionBlocks;
use crate::light::SectionLight;
use crate::occlusion::SectionOcclusion;

/// One 16x16x16 sub-volume of a chunk: block states, light, and the cached
/// face visibility table.
#[derive(Debug, Default)]
pub struct ChunkSection {
    /// Block states.
    pub blocks: SectionBlocks,
    /// Light cells.
    pub light: SectionLight,
    /// Face-to-face visibility cache.
    pub occlusion: SectionOcclusion,
}

impl ChunkSection {
    /// Creates an empty, dark section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
