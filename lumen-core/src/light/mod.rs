//! Light storage primitives.

mod border;
mod cell;
mod queue;
mod section;

pub use border::BorderLight;
pub use cell::LightCell;
pub use queue::LightQueue;
pub use section::SectionLight;

/// The maximum light level of either channel.
pub const MAX_LIGHT: u8 = 15;
