use crate::light::MAX_LIGHT;

/// Block and sky light of one voxel, packed into a single byte.
///
/// The low nibble holds block light, the high nibble sky light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightCell(pub u8);

impl LightCell {
    /// The sky light bits.
    pub const SKY_MASK: u8 = 0xF0;
    /// The block light bits.
    pub const BLOCK_MASK: u8 = 0x0F;

    /// No light on either channel.
    pub const EMPTY: Self = Self(0);
    /// Full sky light, no block light.
    pub const FULL_SKY: Self = Self(Self::SKY_MASK);

    /// Packs the two channels into a cell.
    #[must_use]
    pub fn new(block: u8, sky: u8) -> Self {
        debug_assert!(block <= MAX_LIGHT && sky <= MAX_LIGHT);
        Self(sky << 4 | block)
    }

    /// The block light level.
    #[must_use]
    #[inline]
    pub const fn block(self) -> u8 {
        self.0 & Self::BLOCK_MASK
    }

    /// The sky light level.
    #[must_use]
    #[inline]
    pub const fn sky(self) -> u8 {
        self.0 >> 4
    }

    /// Returns the cell with its block light replaced.
    #[must_use]
    #[inline]
    pub const fn with_block(self, level: u8) -> Self {
        Self(self.0 & Self::SKY_MASK | level)
    }

    /// Returns the cell with its sky light replaced.
    #[must_use]
    #[inline]
    pub const fn with_sky(self, level: u8) -> Self {
        Self(self.0 & Self::BLOCK_MASK | level << 4)
    }

    /// The brighter of the two channels.
    #[must_use]
    pub fn max(self) -> u8 {
        self.block().max(self.sky())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn packs_both_channels() {
        let cell = LightCell::new(3, 12);
        assert_eq!(cell.block(), 3);
        assert_eq!(cell.sky(), 12);
        assert_eq!(cell.max(), 12);
    }

    #[test]
    fn with_channel_keeps_the_other() {
        let cell = LightCell::new(5, 9);
        assert_eq!(cell.with_block(15), LightCell::new(15, 9));
        assert_eq!(cell.with_sky(0), LightCell::new(5, 0));
    }

    #[test]
    fn constants() {
        assert_eq!(LightCell::EMPTY.max(), 0);
        assert_eq!(LightCell::FULL_SKY.sky(), 15);
        assert_eq!(LightCell::FULL_SKY.block(), 0);
    }
}
