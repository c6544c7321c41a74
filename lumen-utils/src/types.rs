use std::fmt::{self, Display};

use serde::Deserialize;

use crate::math::{Vector2, Vector3};

/// A registered block state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct BlockStateId(pub u16);

impl BlockStateId {
    /// The identifier of the air state. Always registered first.
    pub const AIR: Self = Self(0);

    /// Returns whether this is the air state.
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl Display for BlockStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chunk column position in chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos(pub Vector2<i32>);

impl ChunkPos {
    /// Creates a chunk position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    /// The x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    /// The z coordinate.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.y
    }

    /// Returns the position offset by the given chunk deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dz)
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0.x, self.0.y)
    }
}

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a block position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The position of the chunk column containing this block.
    #[must_use]
    pub const fn chunk_pos(&self) -> ChunkPos {
        ChunkPos::new(self.0.x >> 4, self.0.z >> 4)
    }

    /// The x coordinate relative to the containing chunk, in `0..16`.
    #[must_use]
    pub const fn in_chunk_x(&self) -> u8 {
        (self.0.x & 15) as u8
    }

    /// The z coordinate relative to the containing chunk, in `0..16`.
    #[must_use]
    pub const fn in_chunk_z(&self) -> u8 {
        (self.0.z & 15) as u8
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn chunk_pos_of_negative_block() {
        assert_eq!(BlockPos::new(-1, 64, -17).chunk_pos(), ChunkPos::new(-1, -2));
        assert_eq!(BlockPos::new(-1, 64, -17).in_chunk_x(), 15);
        assert_eq!(BlockPos::new(-1, 64, -17).in_chunk_z(), 15);
    }

    #[test]
    fn chunk_pos_offset() {
        assert_eq!(ChunkPos::new(3, -2).offset(-1, 1), ChunkPos::new(2, -1));
    }
}
