use core::ops::{BitOr, BitOrAssign};

/// A single UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiEvent {
    Select,
    Unselect,
    SelectNext,
    SelectPrev,
    ValueAdd,
    ValueSub,
    FigureView,
    FigureExit,
}

impl UiEvent {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of events posted between two UI steps.
///
/// ```
/// use duoscope::ui::{EventSet, UiEvent};
///
/// let events = EventSet::from(UiEvent::SelectNext) | UiEvent::ValueAdd;
/// assert!(events.contains(UiEvent::ValueAdd));
/// assert!(!events.contains(UiEvent::Select));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSet(u8);

impl EventSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn with(self, event: UiEvent) -> Self {
        Self(self.0 | event.bit())
    }

    pub fn insert(&mut self, event: UiEvent) {
        self.0 |= event.bit();
    }

    pub const fn contains(self, event: UiEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<UiEvent> for EventSet {
    fn from(event: UiEvent) -> Self {
        Self::empty().with(event)
    }
}

impl BitOr for EventSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<UiEvent> for EventSet {
    type Output = Self;

    fn bitor(self, rhs: UiEvent) -> Self {
        self.with(rhs)
    }
}

impl BitOrAssign for EventSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
