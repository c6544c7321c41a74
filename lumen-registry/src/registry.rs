use lumen_utils::BlockStateId;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::light::LightProperties;

/// Errors raised while building a [`BlockRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block name was registered twice.
    #[error("block {0:?} is already registered")]
    DuplicateName(String),
    /// An emission level above 15 was supplied.
    #[error("block {name:?} has emission {emission}, maximum is 15")]
    EmissionOutOfRange {
        /// The offending block name.
        name: String,
        /// The rejected emission level.
        emission: u8,
    },
    /// A passage list named an unknown direction.
    #[error("block {name:?} lists unknown direction {direction:?}")]
    UnknownDirection {
        /// The offending block name.
        name: String,
        /// The unrecognised direction name.
        direction: String,
    },
    /// The definition file could not be parsed.
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// The registered properties of one block state.
#[derive(Debug, Clone)]
pub struct BlockProperties {
    /// Unique block name.
    pub name: String,
    /// Whether all six faces are full opaque squares.
    pub fully_opaque: bool,
    /// Light behaviour.
    pub light: LightProperties,
}

/// Immutable table of block states, indexed by [`BlockStateId`].
#[derive(Debug)]
pub struct BlockRegistry {
    by_id: Vec<BlockProperties>,
    by_name: FxHashMap<String, BlockStateId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Creates a registry holding only the air state at id 0.
    #[must_use]
    pub fn new() -> Self {
        let air = BlockProperties {
            name: "air".to_owned(),
            fully_opaque: false,
            light: LightProperties::TRANSPARENT,
        };
        let mut by_name = FxHashMap::default();
        by_name.insert(air.name.clone(), BlockStateId::AIR);
        Self {
            by_id: vec![air],
            by_name,
        }
    }

    /// Registers a block state and returns its id.
    ///
    /// # Errors
    /// Returns an error when the name is taken or the emission is out of range.
    pub fn register(&mut self, properties: BlockProperties) -> Result<BlockStateId, RegistryError> {
        if self.by_name.contains_key(&properties.name) {
            return Err(RegistryError::DuplicateName(properties.name));
        }
        if properties.light.emission > 15 {
            return Err(RegistryError::EmissionOutOfRange {
                name: properties.name,
                emission: properties.light.emission,
            });
        }
        let id = BlockStateId(u16::try_from(self.by_id.len()).unwrap_or(u16::MAX));
        self.by_name.insert(properties.name.clone(), id);
        self.by_id.push(properties);
        Ok(id)
    }

    /// Looks a state up by id.
    #[must_use]
    pub fn get(&self, id: BlockStateId) -> Option<&BlockProperties> {
        self.by_id.get(id.0 as usize)
    }

    /// Looks a state id up by name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<BlockStateId> {
        self.by_name.get(name).copied()
    }

    /// Returns whether `id` is a full opaque cube. Unknown ids count as open.
    #[must_use]
    pub fn is_fully_opaque(&self, id: BlockStateId) -> bool {
        self.get(id).is_some_and(|p| p.fully_opaque)
    }

    /// Returns the light properties of `id`. Unknown ids behave as air.
    #[must_use]
    pub fn light(&self, id: BlockStateId) -> &LightProperties {
        self.get(id)
            .map_or(&LightProperties::TRANSPARENT, |p| &p.light)
    }

    /// The number of registered states, air included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns whether only air is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.len() <= 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stone() -> BlockProperties {
        BlockProperties {
            name: "stone".to_owned(),
            fully_opaque: true,
            light: LightProperties::OPAQUE,
        }
    }

    #[test]
    fn air_is_preregistered() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.id_of("air"), Some(BlockStateId::AIR));
        assert!(!registry.is_fully_opaque(BlockStateId::AIR));
        assert!(registry.light(BlockStateId::AIR).passes_skylight_down());
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let mut registry = BlockRegistry::new();
        let id = registry.register(stone()).unwrap();
        assert_eq!(id, BlockStateId(1));
        assert!(registry.is_fully_opaque(id));
        assert_eq!(registry.id_of("stone"), Some(id));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register(stone()).unwrap();
        assert!(matches!(
            registry.register(stone()),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn emission_above_fifteen_is_rejected() {
        let mut registry = BlockRegistry::new();
        let mut bad = stone();
        bad.name = "sun".to_owned();
        bad.light.emission = 16;
        assert!(matches!(
            registry.register(bad),
            Err(RegistryError::EmissionOutOfRange { emission: 16, .. })
        ));
    }

    #[test]
    fn unknown_ids_behave_as_air() {
        let registry = BlockRegistry::new();
        let ghost = BlockStateId(999);
        assert!(!registry.is_fully_opaque(ghost));
        assert_eq!(registry.light(ghost), &LightProperties::TRANSPARENT);
    }
}
