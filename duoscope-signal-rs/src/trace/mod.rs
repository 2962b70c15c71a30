//! Persistence trace of recent acquisition samples.
//!
//! The acquisition interrupt maps each [`SamplePair`] to a screen position
//! ([`TraceMapping`]) and inserts it into the [`TraceAccumulator`]. The
//! accumulator keeps the most recent `M` points in a FIFO and, alongside it,
//! a [`HitGrid`] with one counter per display pixel:
//!
//! ```text
//! insert(p) ──► ring full? ──yes──► pop oldest q, grid[q] -= 1
//!                  │
//!                  └──────────────► push p,       grid[p] += 1
//! ```
//!
//! At every moment each grid cell equals the number of ring entries at that
//! pixel, so the composer can draw the whole trace by reading the grid
//! without ever walking (or locking) the ring.
//!
//! [`SamplePair`]: crate::transfer::SamplePair

mod accumulator;
mod grid;

pub use accumulator::{TraceAccumulator, DEFAULT_TRACE_CAPACITY};
pub use grid::{HitGrid, GRID_HEIGHT, GRID_WIDTH};

use crate::transfer::SamplePair;

/// A pixel position on the display, always within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TracePoint {
    x: u8,
    y: u8,
}

impl TracePoint {
    /// Returns `None` if the position lies outside the display.
    pub const fn new(x: usize, y: usize) -> Option<Self> {
        if x < GRID_WIDTH && y < GRID_HEIGHT {
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    /// Clip a position onto the display edge.
    pub fn saturating(x: u32, y: u32) -> Self {
        Self {
            x: x.min(GRID_WIDTH as u32 - 1) as u8,
            y: y.min(GRID_HEIGHT as u32 - 1) as u8,
        }
    }

    pub const fn x(self) -> usize {
        self.x as usize
    }

    pub const fn y(self) -> usize {
        self.y as usize
    }
}

/// Linear map from raw input codes to the XY plot area.
///
/// Input A drives the horizontal axis and input B the vertical one:
/// `x = a · span / code_max + x_offset`, same for `y` with `b`. Results past
/// the display edge are clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TraceMapping {
    /// Full-scale input code. Default: 4095.
    pub code_max: u16,
    /// Plot side length in pixels. Default: 60.
    pub span: u16,
    /// Left edge of the plot. Default: 34.
    pub x_offset: u16,
    /// Top edge of the plot. Default: 2.
    pub y_offset: u16,
}

impl Default for TraceMapping {
    fn default() -> Self {
        Self {
            code_max: 4095,
            span: 60,
            x_offset: 34,
            y_offset: 2,
        }
    }
}

impl TraceMapping {
    pub fn map(&self, pair: SamplePair) -> TracePoint {
        TracePoint::saturating(self.axis(pair.a, self.x_offset), self.axis(pair.b, self.y_offset))
    }

    fn axis(&self, code: u16, offset: u16) -> u32 {
        let code_max = u32::from(self.code_max.max(1));
        u32::from(code) * u32::from(self.span) / code_max + u32::from(offset)
    }
}
