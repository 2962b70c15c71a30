use core::f32::consts::PI;

use super::geometry::SelectionRect;
use crate::clock::{Clock, SoftTimer};

/// Timing and shape of the selection highlight move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationConfig {
    /// Length of one move in seconds. Default: 0.3.
    pub duration_secs: f32,
    /// How much the rectangle shrinks at mid-flight (0 = not at all).
    /// Default: 0.25.
    pub pinch: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: 0.3,
            pinch: 0.25,
        }
    }
}

/// Rectangle `progress` of the way from `from` to `to`.
///
/// The center and size follow the ease-in-out curve `(1 − cos πt) / 2`; the
/// size is additionally scaled by `1 − pinch · sin πt`, so the highlight
/// contracts mid-flight and lands at exactly its target size.
pub fn interpolate(
    from: &SelectionRect,
    to: &SelectionRect,
    progress: f32,
    pinch: f32,
) -> SelectionRect {
    let t = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
    let ease = (1.0 - libm::cosf(PI * t)) / 2.0;
    let squeeze = 1.0 - pinch * libm::sinf(PI * t);
    let lerp = |a: f32, b: f32| a + (b - a) * ease;

    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    SelectionRect::centered(
        (lerp(fx, tx), lerp(fy, ty)),
        lerp(from.width(), to.width()) * squeeze,
        lerp(from.height(), to.height()) * squeeze,
        lerp(from.radius, to.radius),
    )
}

/// Drives the highlight between field rectangles.
#[derive(Debug, Clone, Copy)]
pub struct SelectionAnimator {
    config: AnimationConfig,
    from: SelectionRect,
    to: SelectionRect,
    highlight: SelectionRect,
    elapsed_secs: f32,
    in_flight: bool,
    timer: SoftTimer,
}

impl SelectionAnimator {
    pub fn new(resting: SelectionRect, config: AnimationConfig) -> Self {
        Self {
            config,
            from: resting,
            to: resting,
            highlight: resting,
            elapsed_secs: 0.0,
            in_flight: false,
            timer: SoftTimer::new(),
        }
    }

    /// Begin a move towards `target`.
    ///
    /// If a move is already in flight, its target becomes the new start.
    pub fn start(&mut self, target: SelectionRect, clock: &impl Clock) {
        if self.in_flight {
            self.from = self.to;
        }
        self.to = target;
        self.elapsed_secs = 0.0;
        self.in_flight = true;
        self.timer.reset(clock);
    }

    /// Advance the current move by the time since the last call.
    pub fn advance(&mut self, clock: &impl Clock) {
        if !self.in_flight {
            self.highlight = self.from;
            return;
        }

        self.elapsed_secs += self.timer.elapsed(clock);
        if self.elapsed_secs >= self.config.duration_secs {
            self.in_flight = false;
            self.elapsed_secs = 0.0;
            self.from = self.to;
            self.highlight = self.to;
            return;
        }

        let progress = self.elapsed_secs / self.config.duration_secs;
        self.highlight = interpolate(&self.from, &self.to, progress, self.config.pinch);
    }

    /// Rectangle to draw this frame.
    pub fn highlight(&self) -> SelectionRect {
        self.highlight
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight
    }

    pub fn target(&self) -> SelectionRect {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ui::geometry::FIELD_RECTS;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    // ── Interpolation ───────────────────────────────────────────────

    #[test]
    fn endpoints_are_exact() {
        let (a, b) = (FIELD_RECTS[0], FIELD_RECTS[1]);
        let start = interpolate(&a, &b, 0.0, 0.25);
        assert!(approx(start.x0, a.x0) && approx(start.y1, a.y1));

        let end = interpolate(&a, &b, 1.0, 0.25);
        assert!(approx(end.x0, b.x0) && approx(end.x1, b.x1));
    }

    #[test]
    fn midpoint_is_centered_and_pinched() {
        let (a, b) = (FIELD_RECTS[0], FIELD_RECTS[2]);
        let mid = interpolate(&a, &b, 0.5, 0.25);
        let (_, ay) = a.center();
        let (_, by) = b.center();
        assert!(approx(mid.center().1, (ay + by) / 2.0));
        assert!(approx(mid.height(), a.height() * 0.75));
    }

    #[test]
    fn progress_outside_unit_range_is_clamped() {
        let (a, b) = (FIELD_RECTS[4], FIELD_RECTS[5]);
        let before = interpolate(&a, &b, -2.0, 0.25);
        let after = interpolate(&a, &b, 3.0, 0.25);
        assert!(approx(before.x0, a.x0));
        assert!(approx(after.x0, b.x0));
    }

    // ── Animator ────────────────────────────────────────────────────

    #[test]
    fn move_completes_after_duration() {
        let clock = ManualClock::new();
        let mut animator = SelectionAnimator::new(FIELD_RECTS[0], AnimationConfig::default());

        animator.start(FIELD_RECTS[1], &clock);
        clock.advance_millis(150);
        animator.advance(&clock);
        assert!(animator.is_animating());
        let mid = animator.highlight();
        assert!(mid.x0 > FIELD_RECTS[0].x0 && mid.x0 < FIELD_RECTS[1].x0);

        clock.advance_millis(200);
        animator.advance(&clock);
        assert!(!animator.is_animating());
        assert_eq!(animator.highlight(), FIELD_RECTS[1]);
    }

    #[test]
    fn retarget_in_flight_starts_from_previous_target() {
        let clock = ManualClock::new();
        let mut animator = SelectionAnimator::new(FIELD_RECTS[0], AnimationConfig::default());

        animator.start(FIELD_RECTS[1], &clock);
        clock.advance_millis(100);
        animator.advance(&clock);
        animator.start(FIELD_RECTS[2], &clock);

        // Restarted: a frame right after the new start sits on the old target.
        animator.advance(&clock);
        let h = animator.highlight();
        assert!(approx(h.x0, FIELD_RECTS[1].x0));
        assert!(approx(h.y0, FIELD_RECTS[1].y0));
        assert_eq!(animator.target(), FIELD_RECTS[2]);
    }

    #[test]
    fn idle_animator_rests_on_current_rect() {
        let clock = ManualClock::new();
        let mut animator = SelectionAnimator::new(FIELD_RECTS[3], AnimationConfig::default());
        clock.advance_millis(1_000);
        animator.advance(&clock);
        assert_eq!(animator.highlight(), FIELD_RECTS[3]);
    }
}
