use std::sync::{Arc, Weak};

use lumen_utils::Direction;

use crate::chunk::Chunk;

/// The eight horizontally adjacent chunks of one chunk.
///
/// References are weak: chunks form a cyclic neighbour graph and are owned
/// solely by the world's chunk map. Completion (all eight slots filled) is a
/// one-shot gate: the first time it is reached the chunk runs its initial
/// full light pass, and later neighbour churn never re-triggers it.
#[derive(Debug, Default)]
pub struct NeighbourSet {
    slots: [Option<Weak<Chunk>>; 8],
    count: u8,
    completed: bool,
}

impl NeighbourSet {
    /// Slot offsets in `(x, z)`, in slot order.
    pub const OFFSETS: [(i32, i32); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    const WEST: usize = 1;
    const EAST: usize = 6;
    const NORTH: usize = 3;
    const SOUTH: usize = 4;

    /// Maps a chunk offset to its slot index.
    #[must_use]
    pub fn index_of(dx: i32, dz: i32) -> Option<usize> {
        Self::OFFSETS.iter().position(|&(x, z)| x == dx && z == dz)
    }

    /// Installs a neighbour.
    ///
    /// # Returns
    /// Whether this install completed the set for the first time.
    pub fn set(&mut self, index: usize, chunk: Weak<Chunk>) -> bool {
        if self.slots[index].is_none() {
            self.count += 1;
        }
        self.slots[index] = Some(chunk);
        if self.count == 8 && !self.completed {
            self.completed = true;
            return true;
        }
        false
    }

    /// Clears a slot. Light already propagated from the removed neighbour is
    /// left in place; the chunk is expected to unload shortly after.
    pub fn remove(&mut self, index: usize) {
        if self.slots[index].take().is_some() {
            self.count -= 1;
        }
    }

    /// Returns whether all eight neighbours are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.count == 8
    }

    /// Upgrades and returns all eight neighbours, or `None` while the set is
    /// incomplete or any neighbour was dropped. Cross-chunk operations must
    /// go through this gate and defer when it yields nothing.
    #[must_use]
    pub fn get(&self) -> Option<[Arc<Chunk>; 8]> {
        if !self.is_complete() {
            return None;
        }
        let upgrade = |index: usize| self.slots[index].as_ref()?.upgrade();
        Some([
            upgrade(0)?,
            upgrade(1)?,
            upgrade(2)?,
            upgrade(3)?,
            upgrade(4)?,
            upgrade(5)?,
            upgrade(6)?,
            upgrade(7)?,
        ])
    }

    /// Maps a horizontal direction to the slot index of its orthogonal
    /// neighbour.
    pub(crate) const fn horizontal_slot(dir: Direction) -> usize {
        match dir {
            Direction::West => Self::WEST,
            Direction::East => Self::EAST,
            Direction::North => Self::NORTH,
            Direction::South => Self::SOUTH,
            Direction::Down | Direction::Up => panic!("neighbours are horizontal"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn offsets_cover_all_neighbours() {
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dz == 0 {
                    assert_eq!(NeighbourSet::index_of(dx, dz), None);
                } else {
                    assert!(NeighbourSet::index_of(dx, dz).is_some());
                }
            }
        }
        assert_eq!(NeighbourSet::index_of(-1, 0), Some(NeighbourSet::WEST));
        assert_eq!(NeighbourSet::index_of(1, 0), Some(NeighbourSet::EAST));
        assert_eq!(NeighbourSet::index_of(0, -1), Some(NeighbourSet::NORTH));
        assert_eq!(NeighbourSet::index_of(0, 1), Some(NeighbourSet::SOUTH));
    }

    #[test]
    fn completion_is_one_shot() {
        let mut set = NeighbourSet::default();
        for index in 0..7 {
            assert!(!set.set(index, Weak::new()));
        }
        assert!(!set.is_complete());
        assert!(set.set(7, Weak::new()));
        assert!(set.is_complete());
        // reinstalling or cycling a slot never completes again
        assert!(!set.set(3, Weak::new()));
        set.remove(3);
        assert!(!set.is_complete());
        assert!(!set.set(3, Weak::new()));
    }

    #[test]
    fn incomplete_set_yields_nothing() {
        let set = NeighbourSet::default();
        assert!(set.get().is_none());
    }
}
