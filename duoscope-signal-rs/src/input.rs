//! Decoding of the front-panel controls into UI events.
//!
//! The input collaborator (debouncing, key interrupts, quadrature counter)
//! hands over one [`InputSnapshot`] per main-loop pass. [`InputDecoder`]
//! turns it into at most one control gesture, in priority order:
//!
//! | Gesture                    | Events                       |
//! |----------------------------|------------------------------|
//! | select key click           | `Select`, `Unselect`         |
//! | view key click             | `FigureView`, `FigureExit`   |
//! | rotary ≥ one detent up     | `SelectNext`, `ValueAdd`     |
//! | rotary ≥ one detent down   | `SelectPrev`, `ValueSub`     |
//!
//! Each gesture maps to a pair of events; the UI state decides which of the
//! two is meaningful.

use crate::ui::{EventSet, UiEvent};

/// Quadrature counts per rotary detent.
pub const COUNTS_PER_DETENT: i16 = 4;

/// Debounced state of the controls at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Free-running quadrature counter; wraps.
    pub rotary_position: u16,
    /// Select key clicked since the previous snapshot.
    pub select_clicked: bool,
    /// View key clicked since the previous snapshot.
    pub view_clicked: bool,
}

/// Turns snapshots into [`EventSet`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputDecoder {
    baseline: Option<u16>,
}

impl InputDecoder {
    pub const fn new() -> Self {
        Self { baseline: None }
    }

    /// Decode one snapshot.
    ///
    /// The first snapshot only records the rotary baseline. Afterwards the
    /// baseline moves to the current position each time a detent is
    /// reported; partial turns accumulate until they reach a full detent.
    pub fn decode(&mut self, snapshot: InputSnapshot) -> EventSet {
        let Some(baseline) = self.baseline else {
            self.baseline = Some(snapshot.rotary_position);
            return Self::keys(snapshot);
        };

        let keys = Self::keys(snapshot);
        if !keys.is_empty() {
            return keys;
        }

        let delta = snapshot.rotary_position.wrapping_sub(baseline) as i16;
        if delta >= COUNTS_PER_DETENT {
            self.baseline = Some(snapshot.rotary_position);
            EventSet::from(UiEvent::SelectNext) | UiEvent::ValueAdd
        } else if delta <= -COUNTS_PER_DETENT {
            self.baseline = Some(snapshot.rotary_position);
            EventSet::from(UiEvent::SelectPrev) | UiEvent::ValueSub
        } else {
            EventSet::empty()
        }
    }

    fn keys(snapshot: InputSnapshot) -> EventSet {
        if snapshot.select_clicked {
            EventSet::from(UiEvent::Select) | UiEvent::Unselect
        } else if snapshot.view_clicked {
            EventSet::from(UiEvent::FigureView) | UiEvent::FigureExit
        } else {
            EventSet::empty()
        }
    }
}
