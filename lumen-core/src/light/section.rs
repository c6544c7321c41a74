use crate::light::{LightCell, MAX_LIGHT};

const CELLS: usize = 16 * 16 * 16;

/// Light storage for one 16x16x16 section.
///
/// Cells are indexed `y << 8 | z << 4 | x` with all coordinates in `0..16`.
/// The `update` flag is set on every cell change and drained by the chunk
/// when it fires change notifications, coalescing a whole pass into at most
/// one event per section.
#[derive(Debug)]
pub struct SectionLight {
    cells: Box<[LightCell]>,
    update: bool,
}

impl Default for SectionLight {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionLight {
    /// Creates fully dark storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![LightCell::EMPTY; CELLS].into_boxed_slice(),
            update: false,
        }
    }

    /// Reads one cell.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> LightCell {
        debug_assert!(index < CELLS);
        self.cells[index]
    }

    /// Writes one cell, flagging the section when the value changed.
    pub fn set(&mut self, index: usize, cell: LightCell) {
        debug_assert!(index < CELLS);
        if self.cells[index] != cell {
            self.cells[index] = cell;
            self.update = true;
        }
    }

    /// Raises one channel of a cell if `level` beats the stored value.
    ///
    /// # Returns
    /// Whether the cell changed.
    pub fn raise(&mut self, index: usize, level: u8, sky: bool) -> bool {
        debug_assert!(index < CELLS && level <= MAX_LIGHT);
        let cell = self.cells[index];
        let current = if sky { cell.sky() } else { cell.block() };
        if level <= current {
            return false;
        }
        self.cells[index] = if sky {
            cell.with_sky(level)
        } else {
            cell.with_block(level)
        };
        self.update = true;
        true
    }

    /// Zeroes every cell and flags the section for notification.
    pub fn reset(&mut self) {
        self.cells.fill(LightCell::EMPTY);
        self.update = true;
    }

    /// Overwrites the whole grid with externally computed light, for example
    /// levels decoded from a network payload.
    ///
    /// # Panics
    /// Panics when `cells` is not exactly one section worth of data.
    pub fn load(&mut self, cells: &[LightCell]) {
        assert_eq!(cells.len(), CELLS, "light payload has wrong size");
        self.cells.copy_from_slice(cells);
        self.update = true;
    }

    /// Clears and returns the notification flag.
    pub fn take_update(&mut self) -> bool {
        std::mem::take(&mut self.update)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raise_is_monotonic() {
        let mut light = SectionLight::new();
        assert!(light.raise(0, 10, false));
        assert!(!light.raise(0, 10, false));
        assert!(!light.raise(0, 4, false));
        assert!(light.raise(0, 12, false));
        assert_eq!(light.get(0).block(), 12);
        assert_eq!(light.get(0).sky(), 0);
    }

    #[test]
    fn channels_are_independent() {
        let mut light = SectionLight::new();
        light.raise(100, 7, false);
        light.raise(100, 15, true);
        assert_eq!(light.get(100), LightCell::new(7, 15));
    }

    #[test]
    fn update_flag_tracks_changes() {
        let mut light = SectionLight::new();
        assert!(!light.take_update());
        light.raise(0, 1, false);
        assert!(light.take_update());
        assert!(!light.take_update());
        light.set(0, LightCell::new(1, 0));
        assert!(!light.take_update());
        light.reset();
        assert!(light.take_update());
    }

    #[test]
    fn load_replaces_everything() {
        let mut light = SectionLight::new();
        let payload = vec![LightCell::new(2, 13); CELLS];
        light.load(&payload);
        assert_eq!(light.get(4095), LightCell::new(2, 13));
        assert!(light.take_update());
    }
}
