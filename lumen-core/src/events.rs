//! Change notifications for downstream consumers.

use lumen_utils::ChunkPos;

/// A "section light changed" notification.
///
/// `own_chunk` tells the consumer whether the change originated in the named
/// section itself or spilled over from an adjacent one, so it can decide
/// whether to also re-check vertical neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLightUpdate {
    /// Position of the chunk containing the section.
    pub chunk: ChunkPos,
    /// Vertical section index.
    pub section_height: i32,
    /// Whether the triggering change happened inside this section.
    pub own_chunk: bool,
}

/// Sink for light change notifications.
///
/// Within one recomputation pass each affected section is reported at most
/// once, no matter how many of its cells changed.
pub trait LightEvents: Send + Sync {
    /// Called after a section's stored light changed.
    fn section_light_changed(&self, update: SectionLightUpdate);
}

/// An event sink that discards everything.
#[derive(Debug, Default)]
pub struct NoopEvents;

impl LightEvents for NoopEvents {
    fn section_light_changed(&self, _update: SectionLightUpdate) {}
}
