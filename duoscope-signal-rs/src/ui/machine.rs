use super::animation::{AnimationConfig, SelectionAnimator};
use super::event::{EventSet, UiEvent};
use super::geometry::{field_rect, SelectionRect};
use crate::channel::{ChannelParameters, FieldIndex, StepDirection, CHANNEL_COUNT};
use crate::clock::Clock;
use crate::transfer::ChannelId;

/// Top-level UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiState {
    /// Moving the selection over the six fields.
    #[default]
    Browse,
    /// Changing the selected field's value.
    Edit,
    /// Full-screen XY trace.
    FigureView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Browse,
    Edit,
    FigureView,
}

struct Transition {
    from: UiState,
    /// `None` matches unconditionally.
    trigger: Option<UiEvent>,
    to: UiState,
    action: Action,
}

/// Scanned in order; the first row whose `from` and `trigger` match wins.
const TRANSITIONS: [Transition; 7] = [
    row(UiState::Browse, Some(UiEvent::Select), UiState::Edit, Action::Browse),
    row(UiState::Browse, Some(UiEvent::FigureView), UiState::FigureView, Action::Browse),
    row(UiState::Browse, None, UiState::Browse, Action::Browse),
    row(UiState::Edit, Some(UiEvent::Unselect), UiState::Browse, Action::Edit),
    row(UiState::Edit, None, UiState::Edit, Action::Edit),
    row(UiState::FigureView, Some(UiEvent::FigureExit), UiState::Browse, Action::FigureView),
    row(UiState::FigureView, None, UiState::FigureView, Action::FigureView),
];

const fn row(from: UiState, trigger: Option<UiEvent>, to: UiState, action: Action) -> Transition {
    Transition {
        from,
        trigger,
        to,
        action,
    }
}

/// Result of one [`UiMachine::step()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepOutcome {
    pub previous: UiState,
    pub state: UiState,
    /// Editing just finished; the channel parameters should be applied.
    pub committed: bool,
}

/// Snapshot of everything the frame composer draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiView {
    pub state: UiState,
    pub selected: FieldIndex,
    pub highlight: SelectionRect,
    pub channels: [ChannelParameters; CHANNEL_COUNT],
}

impl UiView {
    pub fn is_editing(&self) -> bool {
        self.state == UiState::Edit
    }
}

/// The UI state machine.
///
/// Events are [`post()`](Self::post)ed between iterations and consumed by
/// the next [`step()`](Self::step), which applies at most one transition and
/// runs the action of the state it left.
///
/// ```
/// use duoscope::clock::ManualClock;
/// use duoscope::ui::{EventSet, UiEvent, UiMachine, UiState};
///
/// let clock = ManualClock::new();
/// let mut ui = UiMachine::default();
///
/// ui.post(UiEvent::Select.into());
/// assert_eq!(ui.step(&clock).state, UiState::Edit);
///
/// ui.post(EventSet::from(UiEvent::Unselect));
/// let outcome = ui.step(&clock);
/// assert_eq!(outcome.state, UiState::Browse);
/// assert!(outcome.committed);
/// ```
pub struct UiMachine {
    state: UiState,
    pending: EventSet,
    selected: FieldIndex,
    channels: [ChannelParameters; CHANNEL_COUNT],
    animator: SelectionAnimator,
}

impl UiMachine {
    pub fn new(channels: [ChannelParameters; CHANNEL_COUNT], animation: AnimationConfig) -> Self {
        let selected = FieldIndex::default();
        Self {
            state: UiState::Browse,
            pending: EventSet::empty(),
            selected,
            channels,
            animator: SelectionAnimator::new(field_rect(selected), animation),
        }
    }

    /// Add events for the next step. Events accumulate until consumed.
    pub fn post(&mut self, events: EventSet) {
        self.pending |= events;
    }

    /// Apply one transition and clear the pending events.
    pub fn step(&mut self, clock: &impl Clock) -> StepOutcome {
        let events = self.pending;
        let previous = self.state;

        let matched = TRANSITIONS
            .iter()
            .find(|t| t.from == previous && t.trigger.map_or(true, |e| events.contains(e)));
        if let Some(transition) = matched {
            self.state = transition.to;
            match transition.action {
                Action::Browse => self.browse(events, clock),
                Action::Edit => self.edit(events),
                Action::FigureView => {}
            }
        }

        self.pending.clear();

        let committed = previous == UiState::Edit && self.state == UiState::Browse;
        #[cfg(feature = "defmt")]
        if committed {
            defmt::info!("Parameters committed: {} / {}", self.channels[0], self.channels[1]);
        }

        StepOutcome {
            previous,
            state: self.state,
            committed,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn selected(&self) -> FieldIndex {
        self.selected
    }

    pub fn parameters(&self, channel: ChannelId) -> &ChannelParameters {
        &self.channels[channel.index()]
    }

    pub fn view(&self) -> UiView {
        UiView {
            state: self.state,
            selected: self.selected,
            highlight: self.animator.highlight(),
            channels: self.channels,
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    fn browse(&mut self, events: EventSet, clock: &impl Clock) {
        let target = if events.contains(UiEvent::SelectNext) {
            Some(self.selected.next())
        } else if events.contains(UiEvent::SelectPrev) {
            Some(self.selected.prev())
        } else {
            None
        };

        match target {
            Some(index) => {
                self.selected = index;
                self.animator.start(field_rect(index), clock);
            }
            None => self.animator.advance(clock),
        }
    }

    fn edit(&mut self, events: EventSet) {
        let direction = if events.contains(UiEvent::ValueAdd) {
            StepDirection::Add
        } else if events.contains(UiEvent::ValueSub) {
            StepDirection::Sub
        } else {
            return;
        };
        let channel = self.selected.channel();
        self.channels[channel.index()].step_field(self.selected.field(), direction);
    }
}

impl Default for UiMachine {
    fn default() -> Self {
        Self::new([ChannelParameters::default(); CHANNEL_COUNT], AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Field;
    use crate::clock::ManualClock;
    use crate::ui::geometry::FIELD_RECTS;

    fn step_with(ui: &mut UiMachine, clock: &ManualClock, events: EventSet) -> StepOutcome {
        ui.post(events);
        ui.step(clock)
    }

    fn ev(event: UiEvent) -> EventSet {
        EventSet::from(event)
    }

    // ── Transitions ─────────────────────────────────────────────────

    #[test]
    fn starts_browsing_first_field() {
        let ui = UiMachine::default();
        assert_eq!(ui.state(), UiState::Browse);
        assert_eq!(ui.selected().index(), 0);
        assert_eq!(ui.view().highlight, FIELD_RECTS[0]);
    }

    #[test]
    fn transition_table() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();

        assert_eq!(step_with(&mut ui, &clock, EventSet::empty()).state, UiState::Browse);
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::FigureView)).state, UiState::FigureView);
        // Only FigureExit leaves the figure view.
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::Select)).state, UiState::FigureView);
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::FigureExit)).state, UiState::Browse);
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::Select)).state, UiState::Edit);
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::FigureView)).state, UiState::Edit);
        assert_eq!(step_with(&mut ui, &clock, ev(UiEvent::Unselect)).state, UiState::Browse);
    }

    #[test]
    fn first_matching_row_wins() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        let outcome = step_with(&mut ui, &clock, ev(UiEvent::Select) | UiEvent::FigureView);
        assert_eq!(outcome.state, UiState::Edit);
    }

    #[test]
    fn events_are_cleared_after_step() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        ui.post(ev(UiEvent::Select));
        ui.step(&clock);
        assert_eq!(ui.step(&clock).state, UiState::Edit);
    }

    #[test]
    fn commit_only_when_leaving_edit() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();

        assert!(!step_with(&mut ui, &clock, ev(UiEvent::FigureView)).committed);
        assert!(!step_with(&mut ui, &clock, ev(UiEvent::FigureExit)).committed);
        assert!(!step_with(&mut ui, &clock, ev(UiEvent::Select)).committed);
        assert!(!step_with(&mut ui, &clock, ev(UiEvent::ValueAdd)).committed);

        let outcome = step_with(&mut ui, &clock, ev(UiEvent::Unselect));
        assert_eq!(outcome.previous, UiState::Edit);
        assert!(outcome.committed);
    }

    // ── Value edits ─────────────────────────────────────────────────

    #[test]
    fn edit_changes_selected_field_only() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        // Move to CH2 frequency, then edit it.
        step_with(&mut ui, &clock, ev(UiEvent::SelectNext));
        step_with(&mut ui, &clock, ev(UiEvent::Select));
        step_with(&mut ui, &clock, ev(UiEvent::ValueAdd));
        step_with(&mut ui, &clock, ev(UiEvent::ValueAdd));

        assert_eq!(ui.parameters(ChannelId::Ch2).frequency_khz, 2.0);
        assert_eq!(ui.parameters(ChannelId::Ch1), &ChannelParameters::default());
    }

    #[test]
    fn edit_clamps_at_bounds() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        step_with(&mut ui, &clock, ev(UiEvent::Select));
        for _ in 0..30 {
            step_with(&mut ui, &clock, ev(UiEvent::ValueAdd));
        }
        assert_eq!(ui.parameters(ChannelId::Ch1).frequency_khz, 6.0);
        for _ in 0..30 {
            step_with(&mut ui, &clock, ev(UiEvent::ValueSub));
        }
        assert_eq!(ui.parameters(ChannelId::Ch1).frequency_khz, 1.0);
    }

    #[test]
    fn value_events_ignored_while_browsing() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        step_with(&mut ui, &clock, ev(UiEvent::ValueAdd) | UiEvent::SelectNext);
        assert_eq!(ui.parameters(ChannelId::Ch1), &ChannelParameters::default());
        assert_eq!(ui.selected().index(), 1);
    }

    #[test]
    fn selection_moves_not_applied_while_editing() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        step_with(&mut ui, &clock, ev(UiEvent::Select));
        step_with(&mut ui, &clock, ev(UiEvent::SelectPrev) | UiEvent::ValueSub);
        assert_eq!(ui.selected().index(), 0);
        assert_eq!(ui.selected().field(), Field::Frequency);
    }

    // ── Selection ───────────────────────────────────────────────────

    #[test]
    fn selection_wraps_both_ways() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        step_with(&mut ui, &clock, ev(UiEvent::SelectPrev));
        assert_eq!(ui.selected().index(), 5);
        step_with(&mut ui, &clock, ev(UiEvent::SelectNext));
        assert_eq!(ui.selected().index(), 0);
    }

    #[test]
    fn highlight_settles_on_selected_field() {
        let clock = ManualClock::new();
        let mut ui = UiMachine::default();
        step_with(&mut ui, &clock, ev(UiEvent::SelectNext));
        step_with(&mut ui, &clock, ev(UiEvent::SelectNext));

        clock.advance_millis(400);
        step_with(&mut ui, &clock, EventSet::empty());
        assert_eq!(ui.view().highlight, FIELD_RECTS[2]);
    }
}
