use lumen_utils::BlockStateId;

use crate::chunk::BLOCKS_PER_SECTION;

/// Block storage for one section.
///
/// Sections that hold a single state everywhere (usually air) stay in the
/// compact form until a differing state is written.
#[derive(Debug)]
pub enum SectionBlocks {
    /// Every voxel holds the same state.
    Homogeneous(BlockStateId),
    /// Per-voxel states, indexed `y << 8 | z << 4 | x`.
    Heterogeneous {
        /// The state of every voxel.
        states: Box<[BlockStateId]>,
        /// Number of non-air voxels, kept in sync by `set`.
        non_air: u16,
    },
}

impl Default for SectionBlocks {
    fn default() -> Self {
        Self::Homogeneous(BlockStateId::AIR)
    }
}

impl SectionBlocks {
    /// Reads the state of one voxel.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> BlockStateId {
        debug_assert!(index < BLOCKS_PER_SECTION);
        match self {
            Self::Homogeneous(state) => *state,
            Self::Heterogeneous { states, .. } => states[index],
        }
    }

    /// Writes the state of one voxel.
    ///
    /// # Returns
    /// The previous state.
    pub fn set(&mut self, index: usize, state: BlockStateId) -> BlockStateId {
        debug_assert!(index < BLOCKS_PER_SECTION);
        match self {
            Self::Homogeneous(current) if *current == state => state,
            Self::Homogeneous(current) => {
                let previous = *current;
                let mut states = vec![previous; BLOCKS_PER_SECTION].into_boxed_slice();
                states[index] = state;
                let mut non_air = if previous.is_air() {
                    0
                } else {
                    BLOCKS_PER_SECTION as u16
                };
                if previous.is_air() && !state.is_air() {
                    non_air += 1;
                } else if !previous.is_air() && state.is_air() {
                    non_air -= 1;
                }
                *self = Self::Heterogeneous { states, non_air };
                previous
            }
            Self::Heterogeneous { states, non_air } => {
                let previous = states[index];
                if previous == state {
                    return previous;
                }
                states[index] = state;
                if previous.is_air() && !state.is_air() {
                    *non_air += 1;
                } else if !previous.is_air() && state.is_air() {
                    *non_air -= 1;
                }
                previous
            }
        }
    }

    /// Returns whether the section holds only air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Homogeneous(state) => state.is_air(),
            Self::Heterogeneous { non_air, .. } => *non_air == 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STONE: BlockStateId = BlockStateId(1);

    #[test]
    fn starts_empty() {
        let blocks = SectionBlocks::default();
        assert!(blocks.is_empty());
        assert_eq!(blocks.get(0), BlockStateId::AIR);
    }

    #[test]
    fn set_materializes_and_counts() {
        let mut blocks = SectionBlocks::default();
        assert_eq!(blocks.set(7, STONE), BlockStateId::AIR);
        assert!(!blocks.is_empty());
        assert_eq!(blocks.get(7), STONE);
        assert_eq!(blocks.get(8), BlockStateId::AIR);

        assert_eq!(blocks.set(7, BlockStateId::AIR), STONE);
        assert!(blocks.is_empty());
    }

    #[test]
    fn redundant_set_is_a_noop() {
        let mut blocks = SectionBlocks::default();
        assert_eq!(blocks.set(0, BlockStateId::AIR), BlockStateId::AIR);
        assert!(matches!(blocks, SectionBlocks::Homogeneous(_)));
        blocks.set(0, STONE);
        assert_eq!(blocks.set(0, STONE), STONE);
        assert!(!blocks.is_empty());
    }
}
