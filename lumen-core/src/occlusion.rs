//! Per-section face-to-face visibility.
//!
//! A section's non-opaque voxels are partitioned into 6-connected regions.
//! Two faces can see each other iff at least one region touches both face
//! planes; the 30 ordered face pairs are cached until the next rebuild.

use lumen_registry::BlockRegistry;
use lumen_utils::Direction;
use rustc_hash::FxHashSet;

use crate::chunk::BLOCKS_PER_SECTION;
use crate::chunk::blocks::SectionBlocks;

const FACE_PAIRS: usize = 30;
const UNASSIGNED: u16 = u16::MAX;

/// Cached face-pair visibility table for one section.
#[derive(Debug, Default)]
pub struct SectionOcclusion {
    table: [bool; FACE_PAIRS],
}

impl SectionOcclusion {
    /// Creates a table with nothing occluded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pair_index(from: Direction, to: Direction) -> usize {
        let from = from as usize;
        let mut to = to as usize;
        debug_assert_ne!(from, to);
        if to > from {
            to -= 1;
        }
        from * 5 + to
    }

    /// Returns whether no open path connects the `from` face to the `to`
    /// face. Visibility is not symmetric in general; query the ordered pair.
    #[must_use]
    pub fn is_occluded(&self, from: Direction, to: Direction) -> bool {
        if from == to {
            return false;
        }
        self.table[Self::pair_index(from, to)]
    }

    /// Marks every pair visible.
    pub fn clear(&mut self) {
        self.table = [false; FACE_PAIRS];
    }

    /// Rebuilds the table from the section's blocks.
    ///
    /// # Returns
    /// Whether the table changed.
    pub fn recalculate(&mut self, blocks: &SectionBlocks, registry: &BlockRegistry) -> bool {
        let next = Self::compute(blocks, registry);
        let changed = next != self.table;
        self.table = next;
        changed
    }

    fn compute(blocks: &SectionBlocks, registry: &BlockRegistry) -> [bool; FACE_PAIRS] {
        if blocks.is_empty() {
            // one region touching every face
            return [false; FACE_PAIRS];
        }

        let mut opaque = [false; BLOCKS_PER_SECTION];
        for (index, slot) in opaque.iter_mut().enumerate() {
            *slot = registry.is_fully_opaque(blocks.get(index));
        }

        let mut regions = [UNASSIGNED; BLOCKS_PER_SECTION];
        let mut faces: [FxHashSet<u16>; 6] = Default::default();
        let mut stack: Vec<u16> = Vec::new();
        let mut next_region: u16 = 0;

        for start in 0..BLOCKS_PER_SECTION {
            if opaque[start] || regions[start] != UNASSIGNED {
                continue;
            }
            let region = next_region;
            next_region += 1;

            regions[start] = region;
            stack.push(start as u16);
            while let Some(index) = stack.pop() {
                let index = usize::from(index);
                let x = index & 15;
                let z = (index >> 4) & 15;
                let y = index >> 8;

                if y == 0 {
                    faces[Direction::Down as usize].insert(region);
                } else if y == 15 {
                    faces[Direction::Up as usize].insert(region);
                }
                if z == 0 {
                    faces[Direction::North as usize].insert(region);
                } else if z == 15 {
                    faces[Direction::South as usize].insert(region);
                }
                if x == 0 {
                    faces[Direction::West as usize].insert(region);
                } else if x == 15 {
                    faces[Direction::East as usize].insert(region);
                }

                let mut visit = |neighbour: usize| {
                    if !opaque[neighbour] && regions[neighbour] == UNASSIGNED {
                        regions[neighbour] = region;
                        stack.push(neighbour as u16);
                    }
                };
                if x > 0 {
                    visit(index - 1);
                }
                if x < 15 {
                    visit(index + 1);
                }
                if z > 0 {
                    visit(index - 16);
                }
                if z < 15 {
                    visit(index + 16);
                }
                if y > 0 {
                    visit(index - 256);
                }
                if y < 15 {
                    visit(index + 256);
                }
            }
        }

        let mut table = [false; FACE_PAIRS];
        for from in Direction::ALL {
            for to in Direction::ALL {
                if from == to {
                    continue;
                }
                let a = &faces[from as usize];
                let b = &faces[to as usize];
                table[Self::pair_index(from, to)] = a.is_empty() || b.is_empty() || a.is_disjoint(b);
            }
        }
        table
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lumen_registry::{BlockProperties, LightProperties};
    use lumen_utils::BlockStateId;

    fn registry() -> (BlockRegistry, BlockStateId) {
        let mut registry = BlockRegistry::new();
        let stone = registry
            .register(BlockProperties {
                name: "stone".to_owned(),
                fully_opaque: true,
                light: LightProperties::OPAQUE,
            })
            .unwrap();
        (registry, stone)
    }

    fn pairs() -> impl Iterator<Item = (Direction, Direction)> {
        Direction::ALL.into_iter().flat_map(|from| {
            Direction::ALL
                .into_iter()
                .filter(move |to| *to != from)
                .map(move |to| (from, to))
        })
    }

    #[test]
    fn empty_section_occludes_nothing() {
        let (registry, _) = registry();
        let mut occlusion = SectionOcclusion::new();
        occlusion.recalculate(&SectionBlocks::default(), &registry);
        for (from, to) in pairs() {
            assert!(!occlusion.is_occluded(from, to), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn full_section_occludes_everything() {
        let (registry, stone) = registry();
        let blocks = SectionBlocks::Homogeneous(stone);
        let mut occlusion = SectionOcclusion::new();
        assert!(occlusion.recalculate(&blocks, &registry));
        for (from, to) in pairs() {
            assert!(occlusion.is_occluded(from, to), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn horizontal_slab_splits_up_from_down() {
        let (registry, stone) = registry();
        let mut blocks = SectionBlocks::default();
        for z in 0..16usize {
            for x in 0..16usize {
                blocks.set(8 << 8 | z << 4 | x, stone);
            }
        }
        let mut occlusion = SectionOcclusion::new();
        occlusion.recalculate(&blocks, &registry);

        assert!(occlusion.is_occluded(Direction::Up, Direction::Down));
        assert!(occlusion.is_occluded(Direction::Down, Direction::Up));
        // both halves reach every side face
        assert!(!occlusion.is_occluded(Direction::Up, Direction::North));
        assert!(!occlusion.is_occluded(Direction::Down, Direction::East));
        assert!(!occlusion.is_occluded(Direction::North, Direction::South));
    }

    #[test]
    fn walled_off_face_is_occluded_from_everything() {
        let (registry, stone) = registry();
        let mut blocks = SectionBlocks::default();
        // seal the top face with a lid
        for z in 0..16usize {
            for x in 0..16usize {
                blocks.set(15 << 8 | z << 4 | x, stone);
            }
        }
        let mut occlusion = SectionOcclusion::new();
        occlusion.recalculate(&blocks, &registry);

        for to in [Direction::Down, Direction::North, Direction::East] {
            assert!(occlusion.is_occluded(Direction::Up, to));
            assert!(occlusion.is_occluded(to, Direction::Up));
        }
        assert!(!occlusion.is_occluded(Direction::Down, Direction::North));
    }

    #[test]
    fn recalculate_reports_changes() {
        let (registry, stone) = registry();
        let mut occlusion = SectionOcclusion::new();
        assert!(!occlusion.recalculate(&SectionBlocks::default(), &registry));
        assert!(occlusion.recalculate(&SectionBlocks::Homogeneous(stone), &registry));
        assert!(!occlusion.recalculate(&SectionBlocks::Homogeneous(stone), &registry));
    }
}
