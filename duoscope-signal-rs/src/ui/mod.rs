//! UI state machine, selection geometry and highlight animation.
//!
//! ```text
//!            select                figureView
//!   Edit ◄──────────── Browse ──────────────► FigureView
//!        ────────────►        ◄──────────────
//!           unselect               figureExit
//! ```
//!
//! Leaving `Edit` for `Browse` is the commit point: the step reports
//! [`StepOutcome::committed`] and the caller applies the edited parameters
//! to the hardware.

mod animation;
mod event;
mod geometry;
mod machine;

pub use animation::{interpolate, AnimationConfig, SelectionAnimator};
pub use event::{EventSet, UiEvent};
pub use geometry::{field_rect, SelectionRect, FIELD_RECTS};
pub use machine::{StepOutcome, UiMachine, UiState, UiView};
