//! Voxel world lighting and visibility culling.
//!
//! Maintains packed per-voxel block and sky light for chunked worlds and a
//! per-section face-to-face visibility table that a mesh builder can use to
//! skip hidden geometry. Light is derived state: it is recomputed from block
//! data and may be discarded and rebuilt at any time.

pub mod chunk;
pub mod config;
pub mod events;
pub mod light;
pub mod occlusion;
pub mod world;

pub use chunk::Chunk;
pub use config::DimensionLight;
pub use events::{LightEvents, NoopEvents, SectionLightUpdate};
pub use light::LightCell;
pub use world::World;
