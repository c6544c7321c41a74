//! Shared value types and concurrency primitives for the lumen engine.

pub mod direction;
pub mod locks;
pub mod math;
mod types;

pub use direction::Direction;
pub use types::{BlockPos, BlockStateId, ChunkPos};
