//! Block state registry and per-state light properties.

mod light;
mod loader;
mod registry;

pub use light::{LightProperties, PassageMask};
pub use loader::BlockDefinition;
pub use registry::{BlockProperties, BlockRegistry, RegistryError};
