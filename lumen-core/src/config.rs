//! Dimension lighting configuration.

use serde::Deserialize;

/// Lighting behaviour of a dimension, passed explicitly into every chunk
/// instead of being read from shared global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DimensionLight {
    /// Whether the dimension has any lighting at all.
    #[serde(default = "default_true")]
    pub light: bool,
    /// Whether the dimension has a sky.
    #[serde(default = "default_true")]
    pub sky_light: bool,
    /// Whether the dimension's ambient effects actually show skylight.
    #[serde(default = "default_true")]
    pub effects_sky_light: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for DimensionLight {
    fn default() -> Self {
        Self {
            light: true,
            sky_light: true,
            effects_sky_light: true,
        }
    }
}

impl DimensionLight {
    /// A dimension without a sky, like a cave dimension.
    pub const NO_SKY: Self = Self {
        light: true,
        sky_light: false,
        effects_sky_light: false,
    };

    /// Returns whether skylight exists and is visible in this dimension.
    #[must_use]
    pub const fn can_skylight(&self) -> bool {
        self.sky_light && self.effects_sky_light
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_skylight() {
        let dimension = DimensionLight::default();
        assert!(dimension.light);
        assert!(dimension.can_skylight());
    }

    #[test]
    fn deserializes_with_defaults() {
        let dimension: DimensionLight = serde_json::from_str("{\"sky_light\": false}").unwrap();
        assert!(dimension.light);
        assert!(!dimension.can_skylight());
    }
}
