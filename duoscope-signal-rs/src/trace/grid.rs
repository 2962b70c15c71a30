use core::sync::atomic::{AtomicU16, Ordering};

use super::TracePoint;

/// Display width in pixels.
pub const GRID_WIDTH: usize = 128;

/// Display height in pixels.
pub const GRID_HEIGHT: usize = 64;

/// Per-pixel hit counters.
///
/// Cells are only ever written by the accumulator, from inside its ring
/// critical section, so plain load/store is enough (and available on every
/// core, unlike atomic read-modify-write). Readers never lock; a reader may
/// see a frame that is one insertion stale, which is acceptable for display.
pub struct HitGrid {
    cells: [[AtomicU16; GRID_WIDTH]; GRID_HEIGHT],
}

impl HitGrid {
    pub const fn new() -> Self {
        Self {
            cells: [const { [const { AtomicU16::new(0) }; GRID_WIDTH] }; GRID_HEIGHT],
        }
    }

    /// Number of trace points currently at `(x, y)`; zero off-grid.
    pub fn hits(&self, x: usize, y: usize) -> u16 {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .map_or(0, |cell| cell.load(Ordering::Relaxed))
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.hits(x, y) > 0
    }

    /// Sum of all cells.
    pub fn total(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|cell| u32::from(cell.load(Ordering::Relaxed)))
            .sum()
    }

    /// Visit every lit pixel, row by row.
    pub fn for_each_lit(&self, mut f: impl FnMut(usize, usize)) {
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.load(Ordering::Relaxed) > 0 {
                    f(x, y);
                }
            }
        }
    }

    // ── Writer side (accumulator only) ──────────────────────────────

    pub(super) fn increment(&self, point: TracePoint) {
        let cell = self.cell(point);
        cell.store(cell.load(Ordering::Relaxed).saturating_add(1), Ordering::Relaxed);
    }

    /// Decrement, never going below zero.
    pub(super) fn decrement(&self, point: TracePoint) {
        let cell = self.cell(point);
        cell.store(cell.load(Ordering::Relaxed).saturating_sub(1), Ordering::Relaxed);
    }

    pub(super) fn clear(&self) {
        self.cells
            .iter()
            .flatten()
            .for_each(|cell| cell.store(0, Ordering::Relaxed));
    }

    fn cell(&self, point: TracePoint) -> &AtomicU16 {
        &self.cells[point.y()][point.x()]
    }
}

impl Default for HitGrid {
    fn default() -> Self {
        Self::new()
    }
}
