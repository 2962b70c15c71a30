use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

use super::{HitGrid, TracePoint};

/// Default number of trace points kept.
pub const DEFAULT_TRACE_CAPACITY: usize = 256;

/// Fixed-capacity FIFO of trace points plus its hit grid.
///
/// Shared between the acquisition interrupt (writer) and the main loop
/// (reader) through `&self`; construct it in a `static`:
///
/// ```
/// use duoscope::trace::{TraceAccumulator, TracePoint};
///
/// static TRACE: TraceAccumulator<4> = TraceAccumulator::new();
///
/// let p = TracePoint::new(40, 20).unwrap();
/// assert_eq!(TRACE.insert(p), None);
/// assert!(TRACE.is_lit(40, 20));
/// ```
pub struct TraceAccumulator<const M: usize = DEFAULT_TRACE_CAPACITY> {
    ring: Mutex<CriticalSectionRawMutex, RefCell<Deque<TracePoint, M>>>,
    grid: HitGrid,
}

impl<const M: usize> TraceAccumulator<M> {
    const NON_EMPTY: () = assert!(M > 0, "trace capacity must be non-zero");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            ring: Mutex::new(RefCell::new(Deque::new())),
            grid: HitGrid::new(),
        }
    }

    /// Append `point`, evicting the oldest point once the ring is full.
    ///
    /// Returns the evicted point, if any. Never fails.
    pub fn insert(&self, point: TracePoint) -> Option<TracePoint> {
        self.ring.lock(|ring| {
            let mut ring = ring.borrow_mut();

            let evicted = if ring.is_full() { ring.pop_front() } else { None };
            if let Some(oldest) = evicted {
                self.grid.decrement(oldest);
            }

            // A slot is free here: either the ring was not full or one was just popped.
            if ring.push_back(point).is_ok() {
                self.grid.increment(point);
            }
            evicted
        })
    }

    /// Drop every point and darken the grid.
    pub fn clear(&self) {
        self.ring.lock(|ring| {
            ring.borrow_mut().clear();
            self.grid.clear();
        });
    }

    pub fn len(&self) -> usize {
        self.ring.lock(|ring| ring.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        M
    }

    /// Oldest point still in the trace.
    pub fn oldest(&self) -> Option<TracePoint> {
        self.ring.lock(|ring| ring.borrow().front().copied())
    }

    /// Lock-free read of one pixel.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.grid.is_lit(x, y)
    }

    /// Lock-free view of every pixel counter.
    pub fn grid(&self) -> &HitGrid {
        &self.grid
    }
}

impl<const M: usize> Default for TraceAccumulator<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{GRID_HEIGHT, GRID_WIDTH};

    /// Deterministic walk over the whole display.
    fn nth_point(n: usize) -> TracePoint {
        TracePoint::new((n * 7) % GRID_WIDTH, (n * 3) % GRID_HEIGHT).unwrap()
    }

    // ── Grid invariant ──────────────────────────────────────────────

    #[test]
    fn grid_sum_tracks_ring_length() {
        let trace = TraceAccumulator::<16>::new();
        for n in 0..40 {
            trace.insert(nth_point(n));
            let expected = (n + 1).min(16);
            assert_eq!(trace.len(), expected);
            assert_eq!(trace.grid().total(), expected as u32);
        }
    }

    #[test]
    fn repeated_pixel_stays_lit_until_last_copy_evicted() {
        let trace = TraceAccumulator::<3>::new();
        let hot = TracePoint::new(50, 30).unwrap();
        trace.insert(hot);
        trace.insert(hot);
        trace.insert(nth_point(1));
        assert_eq!(trace.grid().hits(50, 30), 2);

        trace.insert(nth_point(2));
        assert!(trace.is_lit(50, 30));
        trace.insert(nth_point(3));
        assert!(!trace.is_lit(50, 30));
    }

    // ── Eviction order ──────────────────────────────────────────────

    #[test]
    fn evicts_in_insertion_order() {
        const M: usize = 8;
        const EXTRA: usize = 13;
        let trace = TraceAccumulator::<M>::new();

        for n in 0..M {
            assert_eq!(trace.insert(nth_point(n)), None);
        }
        for n in M..M + EXTRA {
            assert_eq!(trace.insert(nth_point(n)), Some(nth_point(n - M)));
        }
        assert_eq!(trace.oldest(), Some(nth_point(EXTRA)));
    }

    #[test]
    fn cells_never_underflow() {
        let trace = TraceAccumulator::<4>::new();
        for n in 0..100 {
            trace.insert(nth_point(n % 5));
        }
        // Every cell must be explainable by the ring content alone.
        assert_eq!(trace.grid().total(), 4);
        let mut lit = 0;
        trace.grid().for_each_lit(|_, _| lit += 1);
        assert!(lit <= 4);
    }

    #[test]
    fn clear_empties_ring_and_grid() {
        let trace = TraceAccumulator::<8>::new();
        for n in 0..5 {
            trace.insert(nth_point(n));
        }
        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.grid().total(), 0);
        assert_eq!(trace.insert(nth_point(0)), None);
    }

    #[test]
    fn default_capacity() {
        let trace: TraceAccumulator = TraceAccumulator::new();
        assert_eq!(trace.capacity(), DEFAULT_TRACE_CAPACITY);
    }
}
