//! Axis-aligned face directions.

use crate::math::Vector3;

/// One of the six axis-aligned directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Negative y.
    Down = 0,
    /// Positive y.
    Up = 1,
    /// Negative z.
    North = 2,
    /// Positive z.
    South = 3,
    /// Negative x.
    West = 4,
    /// Positive x.
    East = 5,
}

impl Direction {
    /// All six directions in ordinal order.
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// The four horizontal directions.
    pub const HORIZONTAL: [Self; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Returns the unit offset of this direction.
    #[must_use]
    pub const fn offset(self) -> Vector3<i32> {
        match self {
            Self::Down => Vector3::new(0, -1, 0),
            Self::Up => Vector3::new(0, 1, 0),
            Self::North => Vector3::new(0, 0, -1),
            Self::South => Vector3::new(0, 0, 1),
            Self::West => Vector3::new(-1, 0, 0),
            Self::East => Vector3::new(1, 0, 0),
        }
    }

    /// Looks a direction up by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "down" => Self::Down,
            "up" => Self::Up,
            "north" => Self::North,
            "south" => Self::South,
            "west" => Self::West,
            "east" => Self::East,
            _ => return None,
        })
    }
}
