use bitflags::bitflags;
use lumen_utils::Direction;

bitflags! {
    /// Which faces of a block state admit light.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PassageMask: u8 {
        /// The bottom face.
        const DOWN = 1 << 0;
        /// The top face.
        const UP = 1 << 1;
        /// The north face.
        const NORTH = 1 << 2;
        /// The south face.
        const SOUTH = 1 << 3;
        /// The west face.
        const WEST = 1 << 4;
        /// The east face.
        const EAST = 1 << 5;
    }
}

impl PassageMask {
    /// Returns whether light may enter or leave through the face in `dir`.
    #[must_use]
    pub fn allows(self, dir: Direction) -> bool {
        self.contains(Self::from_bits_truncate(1 << dir as u8))
    }
}

/// Light-related properties of a block state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightProperties {
    /// Emitted block light level, `0..=15`.
    pub emission: u8,
    /// Whether skylight may enter this state at all.
    pub skylight_enters: bool,
    /// Whether the state dims skylight by an extra level on the way through.
    pub filters_skylight: bool,
    /// Per-face passage mask.
    pub passage: PassageMask,
}

impl LightProperties {
    /// Fully transparent, non-emitting. Used for air and unknown states.
    pub const TRANSPARENT: Self = Self {
        emission: 0,
        skylight_enters: true,
        filters_skylight: false,
        passage: PassageMask::all(),
    };

    /// Fully opaque, non-emitting.
    pub const OPAQUE: Self = Self {
        emission: 0,
        skylight_enters: false,
        filters_skylight: true,
        passage: PassageMask::empty(),
    };

    /// Returns whether light travelling in `dir` may pass through this state.
    #[must_use]
    pub fn propagates_light(&self, dir: Direction) -> bool {
        self.passage.allows(dir)
    }

    /// Returns whether a full-strength skylight column continues through
    /// this state without loss.
    #[must_use]
    pub fn passes_skylight_down(&self) -> bool {
        self.skylight_enters && !self.filters_skylight && self.propagates_light(Direction::Down)
    }
}
