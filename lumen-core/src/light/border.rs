use crate::light::{LightCell, MAX_LIGHT};

const COLUMNS: usize = 16 * 16;

/// Virtual light layer for the space just outside a chunk's loaded vertical
/// range, one cell per `(x, z)` column indexed `z << 4 | x`.
///
/// Only the bottom layer is materialized; the top layer is defined to carry
/// constant full sky light and needs no storage. Cells start dark, meaning
/// "no light has reached here yet".
#[derive(Debug)]
pub struct BorderLight {
    cells: Box<[LightCell]>,
}

impl Default for BorderLight {
    fn default() -> Self {
        Self::new()
    }
}

impl BorderLight {
    /// Creates a fully dark layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![LightCell::EMPTY; COLUMNS].into_boxed_slice(),
        }
    }

    /// Reads the cell of one column.
    #[must_use]
    #[inline]
    pub fn get(&self, column: usize) -> LightCell {
        debug_assert!(column < COLUMNS);
        self.cells[column]
    }

    /// Raises one channel of a column if `level` beats the stored value.
    pub fn raise(&mut self, column: usize, level: u8, sky: bool) {
        debug_assert!(column < COLUMNS && level <= MAX_LIGHT);
        let cell = self.cells[column];
        let current = if sky { cell.sky() } else { cell.block() };
        if level > current {
            self.cells[column] = if sky {
                cell.with_sky(level)
            } else {
                cell.with_block(level)
            };
        }
    }

    /// Zeroes every column.
    pub fn reset(&mut self) {
        self.cells.fill(LightCell::EMPTY);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raise_keeps_maximum() {
        let mut border = BorderLight::new();
        border.raise(5, 14, true);
        border.raise(5, 9, true);
        assert_eq!(border.get(5).sky(), 14);
        border.raise(5, 3, false);
        assert_eq!(border.get(5), LightCell::new(3, 14));
    }

    #[test]
    fn reset_clears() {
        let mut border = BorderLight::new();
        border.raise(0, 15, true);
        border.reset();
        assert_eq!(border.get(0), LightCell::EMPTY);
    }
}
