//! JSON block definition loading.

use lumen_utils::Direction;
use serde::Deserialize;

use crate::light::{LightProperties, PassageMask};
use crate::registry::{BlockProperties, BlockRegistry, RegistryError};

/// One block definition as it appears in a definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDefinition {
    /// Unique block name.
    pub name: String,
    /// Whether all six faces are full opaque squares.
    #[serde(default)]
    pub fully_opaque: bool,
    /// Emitted block light level.
    #[serde(default)]
    pub emission: u8,
    /// Whether skylight may enter the state.
    #[serde(default = "default_true")]
    pub skylight_enters: bool,
    /// Whether the state dims skylight by an extra level.
    #[serde(default)]
    pub filters_skylight: bool,
    /// Faces that admit light, as lowercase direction names.
    /// Absent means all six faces.
    #[serde(default)]
    pub passage: Option<Vec<String>>,
}

const fn default_true() -> bool {
    true
}

impl BlockDefinition {
    fn into_properties(self) -> Result<BlockProperties, RegistryError> {
        let passage = match self.passage {
            None => PassageMask::all(),
            Some(names) => {
                let mut mask = PassageMask::empty();
                for name in names {
                    let Some(dir) = Direction::from_name(&name) else {
                        return Err(RegistryError::UnknownDirection {
                            name: self.name,
                            direction: name,
                        });
                    };
                    mask |= PassageMask::from_bits_truncate(1 << dir as u8);
                }
                mask
            }
        };
        Ok(BlockProperties {
            name: self.name,
            fully_opaque: self.fully_opaque,
            light: LightProperties {
                emission: self.emission,
                skylight_enters: self.skylight_enters,
                filters_skylight: self.filters_skylight,
                passage,
            },
        })
    }
}

impl BlockRegistry {
    /// Loads a registry from a JSON array of [`BlockDefinition`]s.
    ///
    /// # Errors
    /// Returns an error on malformed JSON or invalid definitions.
    pub fn load_str(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<BlockDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition.into_properties()?)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = r#"[
        {"name": "stone", "fully_opaque": true, "skylight_enters": false, "filters_skylight": true, "passage": []},
        {"name": "glowstone", "fully_opaque": true, "emission": 15, "skylight_enters": false, "filters_skylight": true, "passage": []},
        {"name": "water", "filters_skylight": true},
        {"name": "slab", "passage": ["north", "south", "west", "east", "up"]}
    ]"#;

    #[test]
    fn loads_definitions() {
        let registry = BlockRegistry::load_str(DEFINITIONS).unwrap();
        assert_eq!(registry.len(), 5);

        let stone = registry.id_of("stone").unwrap();
        assert!(registry.is_fully_opaque(stone));
        assert!(!registry.light(stone).propagates_light(Direction::Down));

        let glowstone = registry.id_of("glowstone").unwrap();
        assert_eq!(registry.light(glowstone).emission, 15);

        let water = registry.id_of("water").unwrap();
        assert!(registry.light(water).skylight_enters);
        assert!(!registry.light(water).passes_skylight_down());

        let slab = registry.id_of("slab").unwrap();
        assert!(!registry.light(slab).propagates_light(Direction::Down));
        assert!(registry.light(slab).propagates_light(Direction::Up));
    }

    #[test]
    fn unknown_direction_is_reported() {
        let json = r#"[{"name": "odd", "passage": ["sideways"]}]"#;
        assert!(matches!(
            BlockRegistry::load_str(json),
            Err(RegistryError::UnknownDirection { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            BlockRegistry::load_str("not json"),
            Err(RegistryError::Parse(_))
        ));
    }
}
