//! Frame-driven animation timelines and easing curves.
//!
//! An [`AnimationController`] owns a linear value in `[0, 1]` that the host
//! advances once per frame with [`AnimationController::tick`]. A
//! [`CurvedAnimation`] reads a controller through a [`Curve`], picking a
//! separate curve while the controller runs in reverse.

/// Error bound used when solving a cubic bezier for its parameter.
const CUBIC_ERROR_BOUND: f64 = 0.001;
/// Bisection steps before giving up on the error bound.
const CUBIC_MAX_STEPS: usize = 32;

// =============================================================================
// Curves
// =============================================================================

/// A cubic bezier easing curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// First control point x
    pub x1: f64,
    /// First control point y
    pub y1: f64,
    /// Second control point x
    pub x2: f64,
    /// Second control point y
    pub y2: f64,
}

impl CubicBezier {
    /// Create a cubic bezier curve from its two control points.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The curve rotated 180 degrees, for playing a sequence backwards.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self::new(1.0 - self.x2, 1.0 - self.y2, 1.0 - self.x1, 1.0 - self.y1)
    }

    fn evaluate(a: f64, b: f64, m: f64) -> f64 {
        let inv = 1.0 - m;
        3.0 * a * inv * inv * m + 3.0 * b * inv * m * m + m * m * m
    }

    /// Map `t` along the curve by bisecting for the matching x.
    #[must_use]
    pub fn transform(&self, t: f64) -> f64 {
        let mut start = 0.0;
        let mut end = 1.0;
        let mut midpoint = 0.5;
        for _ in 0..CUBIC_MAX_STEPS {
            midpoint = (start + end) / 2.0;
            let estimate = Self::evaluate(self.x1, self.x2, midpoint);
            if (t - estimate).abs() < CUBIC_ERROR_BOUND {
                break;
            }
            if estimate < t {
                start = midpoint;
            } else {
                end = midpoint;
            }
        }
        Self::evaluate(self.y1, self.y2, midpoint)
    }
}

/// Easing curve applied to a normalized animation value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    /// Identity curve.
    #[default]
    Linear,
    /// Cubic bezier curve.
    Cubic(CubicBezier),
}

impl Curve {
    /// Slow start, abrupt end.
    pub const EASE_IN: Self = Self::Cubic(CubicBezier::new(0.42, 0.0, 1.0, 1.0));
    /// Abrupt start, slow end.
    pub const EASE_OUT: Self = Self::Cubic(CubicBezier::new(0.0, 0.0, 0.58, 1.0));
    /// Quick acceleration, long deceleration.
    pub const FAST_OUT_SLOW_IN: Self = Self::Cubic(CubicBezier::new(0.4, 0.0, 0.2, 1.0));

    /// Apply the curve to `t` in `[0, 1]`.
    ///
    /// The endpoints map to themselves exactly regardless of curve.
    #[must_use]
    pub fn transform(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::Cubic(cubic) => cubic.transform(t),
        }
    }
}

// =============================================================================
// AnimationStatus
// =============================================================================

/// Where a timeline is and which way it is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationStatus {
    /// Stopped at the lower bound.
    #[default]
    Dismissed,
    /// Running (or paused) toward the upper bound.
    Forward,
    /// Running (or paused) toward the lower bound.
    Reverse,
    /// Stopped at the upper bound.
    Completed,
}

impl AnimationStatus {
    /// Whether the status is one of the in-flight directions.
    #[must_use]
    pub const fn is_animating(self) -> bool {
        matches!(self, Self::Forward | Self::Reverse)
    }

    /// At rest at the lower bound.
    #[must_use]
    pub const fn is_dismissed(self) -> bool {
        matches!(self, Self::Dismissed)
    }

    /// At rest at the upper bound.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    from: f64,
    to: f64,
    elapsed: f64,
    total: f64,
}

// =============================================================================
// AnimationController
// =============================================================================

/// A linear `[0, 1]` timeline advanced by host frame ticks.
///
/// A run toward a target takes `duration * |target - value|` seconds, so a
/// timeline interrupted half way finishes in half the time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationController {
    value: f64,
    duration: f64,
    direction: Direction,
    status: AnimationStatus,
    run: Option<Run>,
}

impl AnimationController {
    /// Create a controller resting at `initial` with a full-range `duration`
    /// in seconds.
    #[must_use]
    pub fn new(duration: f64, initial: f64) -> Self {
        let mut controller = Self {
            value: 0.0,
            duration: duration.max(0.0),
            direction: Direction::Forward,
            status: AnimationStatus::Dismissed,
            run: None,
        };
        controller.set_value(initial);
        controller
    }

    /// Current linear value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> AnimationStatus {
        self.status
    }

    /// Full-range duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.run.is_some()
    }

    /// Jump to `value` (clamped), stopping any run. Non-finite values are
    /// ignored.
    ///
    /// Status follows the value: the bounds report dismissed/completed, any
    /// other value reports the last direction of travel.
    pub fn set_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.run = None;
        self.value = value.clamp(0.0, 1.0);
        self.status = self.status_at_rest();
    }

    /// Run toward the upper bound.
    pub fn forward(&mut self) {
        self.animate_with_direction(1.0, Direction::Forward);
    }

    /// Run toward the lower bound.
    pub fn reverse(&mut self) {
        self.animate_with_direction(0.0, Direction::Reverse);
    }

    /// Stop where the timeline currently is.
    pub fn stop(&mut self) {
        self.run = None;
    }

    /// Advance by `dt` seconds. Returns whether a run is still in progress.
    pub fn tick(&mut self, dt: f64) -> bool {
        let Some(mut run) = self.run else {
            return false;
        };
        run.elapsed += dt.max(0.0);
        if run.elapsed >= run.total {
            self.value = run.to;
            self.run = None;
            self.status = match self.direction {
                Direction::Forward => AnimationStatus::Completed,
                Direction::Reverse => AnimationStatus::Dismissed,
            };
            return false;
        }
        let t = run.elapsed / run.total;
        self.value = (run.to - run.from).mul_add(t, run.from);
        self.run = Some(run);
        true
    }

    fn animate_with_direction(&mut self, target: f64, direction: Direction) {
        let target = target.clamp(0.0, 1.0);
        self.direction = direction;
        let total = self.duration * (target - self.value).abs();
        if total <= 0.0 {
            self.set_value(target);
            return;
        }
        self.run = Some(Run {
            from: self.value,
            to: target,
            elapsed: 0.0,
            total,
        });
        self.status = match direction {
            Direction::Forward => AnimationStatus::Forward,
            Direction::Reverse => AnimationStatus::Reverse,
        };
    }

    fn status_at_rest(&self) -> AnimationStatus {
        if self.value == 0.0 {
            AnimationStatus::Dismissed
        } else if self.value == 1.0 {
            AnimationStatus::Completed
        } else {
            match self.direction {
                Direction::Forward => AnimationStatus::Forward,
                Direction::Reverse => AnimationStatus::Reverse,
            }
        }
    }
}

// =============================================================================
// CurvedAnimation
// =============================================================================

/// A curve pairing applied on top of an [`AnimationController`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurvedAnimation {
    /// Curve used while running forward (and at rest).
    pub curve: Curve,
    /// Curve used while running in reverse; `None` reuses `curve`.
    pub reverse_curve: Option<Curve>,
}

impl CurvedAnimation {
    /// Create a curve pairing.
    #[must_use]
    pub const fn new(curve: Curve, reverse_curve: Option<Curve>) -> Self {
        Self {
            curve,
            reverse_curve,
        }
    }

    /// The curve that applies for `status`.
    #[must_use]
    pub fn active_curve(&self, status: AnimationStatus) -> Curve {
        match (status, self.reverse_curve) {
            (AnimationStatus::Reverse, Some(reverse)) => reverse,
            _ => self.curve,
        }
    }

    /// The curved value of `controller`.
    #[must_use]
    pub fn value(&self, controller: &AnimationController) -> f64 {
        self.active_curve(controller.status())
            .transform(controller.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Curve Tests
    // =========================================================================

    #[test]
    fn test_curve_linear() {
        assert_eq!(Curve::Linear.transform(0.0), 0.0);
        assert_eq!(Curve::Linear.transform(0.5), 0.5);
        assert_eq!(Curve::Linear.transform(1.0), 1.0);
    }

    #[test]
    fn test_curve_clamps_input() {
        assert_eq!(Curve::EASE_IN.transform(-0.5), 0.0);
        assert_eq!(Curve::EASE_IN.transform(1.5), 1.0);
    }

    #[test]
    fn test_curve_ease_in_below_linear() {
        assert!(Curve::EASE_IN.transform(0.5) < 0.5);
    }

    #[test]
    fn test_curve_ease_out_above_linear() {
        assert!(Curve::EASE_OUT.transform(0.5) > 0.5);
    }

    #[test]
    fn test_curve_fast_out_slow_in_midpoint() {
        let v = Curve::FAST_OUT_SLOW_IN.transform(0.5);
        assert!(v > 0.7 && v < 0.85, "got {v}");
    }

    #[test]
    fn test_cubic_flipped_mirrors_curve() {
        let cubic = CubicBezier::new(0.31, 0.0, 0.56, 1.0);
        let flipped = cubic.flipped();
        assert!((flipped.x1 - 0.44).abs() < 1e-9);
        assert!((flipped.x2 - 0.69).abs() < 1e-9);
        assert_eq!((flipped.y1, flipped.y2), (0.0, 1.0));
        let v = cubic.transform(0.3);
        let mirrored = 1.0 - flipped.transform(0.7);
        assert!((v - mirrored).abs() < 0.01, "{v} vs {mirrored}");
    }

    #[test]
    fn test_curve_endpoints_exact() {
        for curve in [Curve::EASE_IN, Curve::EASE_OUT, Curve::FAST_OUT_SLOW_IN] {
            assert_eq!(curve.transform(0.0), 0.0);
            assert_eq!(curve.transform(1.0), 1.0);
        }
    }

    #[test]
    fn test_cubic_transform_bounded_on_nan() {
        let cubic = CubicBezier::new(0.0, 0.0, 0.58, 1.0);
        let v = cubic.transform(f64::NAN);
        assert!(v.is_finite());
        assert!((0.0..=1.0).contains(&v));
        assert!(Curve::EASE_OUT.transform(f64::NAN).is_finite());
    }

    // =========================================================================
    // AnimationController Tests
    // =========================================================================

    #[test]
    fn test_controller_initial_status() {
        assert_eq!(
            AnimationController::new(0.2, 0.0).status(),
            AnimationStatus::Dismissed
        );
        assert_eq!(
            AnimationController::new(0.2, 1.0).status(),
            AnimationStatus::Completed
        );
    }

    #[test]
    fn test_controller_forward_runs_to_completion() {
        let mut c = AnimationController::new(0.2, 0.0);
        c.forward();
        assert_eq!(c.status(), AnimationStatus::Forward);
        assert!(c.tick(0.1));
        assert!((c.value() - 0.5).abs() < 1e-9);
        assert!(!c.tick(0.1));
        assert_eq!(c.value(), 1.0);
        assert_eq!(c.status(), AnimationStatus::Completed);
    }

    #[test]
    fn test_controller_reverse_runs_to_dismissed() {
        let mut c = AnimationController::new(0.2, 1.0);
        c.reverse();
        assert_eq!(c.status(), AnimationStatus::Reverse);
        assert!(!c.tick(1.0));
        assert_eq!(c.value(), 0.0);
        assert_eq!(c.status(), AnimationStatus::Dismissed);
    }

    #[test]
    fn test_controller_partial_run_scales_duration() {
        let mut c = AnimationController::new(0.2, 0.0);
        c.set_value(0.5);
        c.forward();
        // Half the range remains, so half the duration.
        assert!(!c.tick(0.1 + 1e-9));
        assert_eq!(c.value(), 1.0);
    }

    #[test]
    fn test_controller_forward_at_bound_is_immediate() {
        let mut c = AnimationController::new(0.2, 1.0);
        c.forward();
        assert!(!c.is_animating());
        assert_eq!(c.status(), AnimationStatus::Completed);
    }

    #[test]
    fn test_controller_set_value_clamps_and_keeps_direction() {
        let mut c = AnimationController::new(0.2, 1.0);
        c.reverse();
        c.set_value(0.4);
        assert!(!c.is_animating());
        assert_eq!(c.status(), AnimationStatus::Reverse);
        c.set_value(7.0);
        assert_eq!(c.value(), 1.0);
        assert_eq!(c.status(), AnimationStatus::Completed);
    }

    #[test]
    fn test_controller_ignores_non_finite_values() {
        let mut c = AnimationController::new(0.2, 0.0);
        c.set_value(0.25);
        let status = c.status();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            c.set_value(bad);
            assert_eq!(c.value(), 0.25);
            assert_eq!(c.status(), status);
        }
        assert_eq!(c.value(), 0.25);
    }

    #[test]
    fn test_controller_tick_idle_returns_false() {
        let mut c = AnimationController::new(0.2, 0.0);
        assert!(!c.tick(0.016));
        assert_eq!(c.value(), 0.0);
    }

    #[test]
    fn test_controller_stop_freezes_value() {
        let mut c = AnimationController::new(0.2, 0.0);
        c.forward();
        c.tick(0.05);
        let v = c.value();
        c.stop();
        assert!(!c.tick(0.05));
        assert_eq!(c.value(), v);
    }

    // =========================================================================
    // CurvedAnimation Tests
    // =========================================================================

    #[test]
    fn test_curved_animation_uses_reverse_curve_in_reverse() {
        let curved = CurvedAnimation::new(Curve::EASE_IN, Some(Curve::EASE_OUT));
        let mut c = AnimationController::new(0.2, 1.0);
        c.reverse();
        c.tick(0.1);
        let expected = Curve::EASE_OUT.transform(c.value());
        assert_eq!(curved.value(&c), expected);
    }

    #[test]
    fn test_curved_animation_without_reverse_curve() {
        let curved = CurvedAnimation::new(Curve::Linear, None);
        assert_eq!(curved.active_curve(AnimationStatus::Reverse), Curve::Linear);
    }

    proptest! {
        #[test]
        fn prop_cubic_curves_stay_in_unit_range(t in 0.0f64..=1.0) {
            for curve in [Curve::EASE_IN, Curve::EASE_OUT, Curve::FAST_OUT_SLOW_IN] {
                let v = curve.transform(t);
                prop_assert!((-0.01..=1.01).contains(&v));
            }
        }

        #[test]
        fn prop_controller_value_stays_in_range(steps in proptest::collection::vec(0.0f64..0.1, 1..20)) {
            let mut c = AnimationController::new(0.2, 0.0);
            c.forward();
            for dt in steps {
                c.tick(dt);
                prop_assert!((0.0..=1.0).contains(&c.value()));
            }
        }
    }
}
