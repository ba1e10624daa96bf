//! Gesture handling and the two animation timelines behind a toggle.
//!
//! The controller owns a position timeline ("how on", 200 ms) and a reaction
//! timeline ("how pressed", 100 ms). Gestures move them; the host advances
//! them with [`ToggleVisualController::tick`] and reads a [`ToggleState`]
//! each frame.
//!
//! The confirmed on/off value belongs to the caller. A drag that ends past
//! the midpoint reports the flipped value and then waits: the thumb only
//! settles once [`ToggleVisualController::set_value`] delivers the caller's
//! answer.

use std::fmt;
use std::rc::Rc;
use tumbler_core::{
    AnimationController, AnimationStatus, Curve, CurvedAnimation, HapticFeedback,
    LayoutDirection, NoHaptics, Platform,
};

/// Full-range duration of the position timeline, in seconds.
pub const POSITION_DURATION: f64 = 0.2;
/// Full-range duration of the reaction timeline, in seconds.
pub const REACTION_DURATION: f64 = 0.1;

/// Callback receiving the value the user asked for.
pub type ChangeCallback = Rc<dyn Fn(bool)>;

const SETTLE_CURVE: CurvedAnimation = CurvedAnimation::new(Curve::EASE_IN, Some(Curve::EASE_OUT));
const DRAG_CURVE: CurvedAnimation = CurvedAnimation::new(Curve::Linear, None);
const COLOR_CURVE: CurvedAnimation = CurvedAnimation::new(Curve::EASE_OUT, Some(Curve::EASE_IN));
const REACTION_CURVE: CurvedAnimation = CurvedAnimation::new(Curve::FAST_OUT_SLOW_IN, None);

/// Animated values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleState {
    /// How on, in `[0, 1]`
    pub position: f32,
    /// How pressed, in `[0, 1]`
    pub reaction: f32,
    /// Position through the ease-out/ease-in color curve
    pub color_position: f32,
    /// Status of the position timeline
    pub position_status: AnimationStatus,
    /// Status of the reaction timeline
    pub reaction_status: AnimationStatus,
}

impl ToggleState {
    /// Fully off or fully on, not pressed.
    #[must_use]
    pub fn at_rest(value: bool) -> Self {
        let (position, status) = if value {
            (1.0, AnimationStatus::Completed)
        } else {
            (0.0, AnimationStatus::Dismissed)
        };
        Self {
            position,
            reaction: 0.0,
            color_position: position,
            position_status: status,
            reaction_status: AnimationStatus::Dismissed,
        }
    }

    /// Resting fully off.
    #[must_use]
    pub const fn is_dismissed(&self) -> bool {
        self.position_status.is_dismissed()
    }

    /// Resting fully on.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.position_status.is_completed()
    }
}

/// Drives a toggle's position and reaction from user gestures.
pub struct ToggleVisualController {
    value: bool,
    position: AnimationController,
    position_curve: CurvedAnimation,
    reaction: AnimationController,
    on_changed: Option<ChangeCallback>,
    haptics: Rc<dyn HapticFeedback>,
    platform: Platform,
    track_inner_length: f32,
    needs_settle: bool,
}

impl ToggleVisualController {
    /// Create a controller resting at `value`.
    ///
    /// `track_inner_length` is the thumb's travel in pixels.
    #[must_use]
    pub fn new(value: bool, track_inner_length: f32) -> Self {
        Self {
            value,
            position: AnimationController::new(POSITION_DURATION, if value { 1.0 } else { 0.0 }),
            position_curve: SETTLE_CURVE,
            reaction: AnimationController::new(REACTION_DURATION, 0.0),
            on_changed: None,
            haptics: Rc::new(NoHaptics),
            platform: Platform::default(),
            track_inner_length,
            needs_settle: false,
        }
    }

    /// Set or clear the change callback. Without one the toggle is disabled.
    pub fn set_on_changed(&mut self, on_changed: Option<ChangeCallback>) {
        self.on_changed = on_changed;
    }

    /// Set the haptic output and the platform that decides whether to use it.
    pub fn set_haptics(&mut self, haptics: Rc<dyn HapticFeedback>, platform: Platform) {
        self.haptics = haptics;
        self.platform = platform;
    }

    /// Set the platform, keeping the haptic output.
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
    }

    /// Update the thumb travel after a geometry change.
    pub fn set_track_inner_length(&mut self, track_inner_length: f32) {
        self.track_inner_length = track_inner_length;
    }

    /// Whether gestures have any effect.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.on_changed.is_some()
    }

    /// The last value confirmed by the caller.
    #[must_use]
    pub const fn value(&self) -> bool {
        self.value
    }

    /// Whether a threshold-crossing drag is waiting for confirmation.
    #[must_use]
    pub const fn is_awaiting_confirmation(&self) -> bool {
        self.needs_settle
    }

    /// Whether either timeline is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.position.is_animating() || self.reaction.is_animating()
    }

    /// Animated values for the current frame.
    #[must_use]
    pub fn state(&self) -> ToggleState {
        ToggleState {
            position: self.position_curve.value(&self.position) as f32,
            reaction: REACTION_CURVE.value(&self.reaction) as f32,
            color_position: COLOR_CURVE.value(&self.position) as f32,
            position_status: self.position.status(),
            reaction_status: self.reaction.status(),
        }
    }

    /// Pointer grabbed the thumb.
    pub fn on_drag_start(&mut self) {
        if !self.is_interactive() {
            return;
        }
        tracing::trace!(value = self.value, "toggle drag start");
        self.reaction.forward();
        self.emit_vibration();
    }

    /// Pointer moved by `delta` pixels horizontally. Non-finite deltas are
    /// dropped.
    pub fn on_drag_update(&mut self, delta: f32, direction: LayoutDirection) {
        if !self.is_interactive() || self.track_inner_length <= 0.0 || !delta.is_finite() {
            return;
        }
        self.position_curve = DRAG_CURVE;
        let step = f64::from(direction.logical_delta(delta) / self.track_inner_length);
        self.position.set_value(self.position.value() + step);
    }

    /// Pointer released. Returns the value reported to the change callback,
    /// if the drag crossed the midpoint.
    pub fn on_drag_end(&mut self) -> Option<bool> {
        if !self.is_interactive() {
            return None;
        }
        let wants_on = self.position.value() >= 0.5;
        tracing::trace!(wants_on, value = self.value, "toggle drag end");
        let emitted = if wants_on == self.value {
            self.animate_to_value();
            None
        } else {
            self.needs_settle = true;
            Some(self.emit_change(!self.value))
        };
        self.reaction.reverse();
        emitted
    }

    /// Drag abandoned by the host: settle back without reporting.
    pub fn on_drag_cancel(&mut self) {
        if !self.is_interactive() {
            return;
        }
        self.animate_to_value();
        self.reaction.reverse();
    }

    /// Pointer went down without dragging yet.
    pub fn on_tap_down(&mut self) {
        if self.is_interactive() {
            self.reaction.forward();
        }
    }

    /// Press released or abandoned.
    pub fn on_tap_cancel(&mut self) {
        if self.is_interactive() {
            self.reaction.reverse();
        }
    }

    /// Tap. Reports the flipped value; the position only moves once the
    /// caller confirms it through [`set_value`](Self::set_value).
    pub fn on_tap(&mut self) -> Option<bool> {
        if !self.is_interactive() {
            return None;
        }
        let next = self.emit_change(!self.value);
        self.emit_vibration();
        Some(next)
    }

    /// The caller's confirmed value.
    pub fn set_value(&mut self, value: bool) {
        let changed = value != self.value;
        self.value = value;
        if changed || self.needs_settle {
            self.needs_settle = false;
            self.animate_to_value();
        }
    }

    /// Advance both timelines by `dt` seconds. Returns whether either is
    /// still running.
    pub fn tick(&mut self, dt: f64) -> bool {
        let position = self.position.tick(dt);
        let reaction = self.reaction.tick(dt);
        position || reaction
    }

    fn animate_to_value(&mut self) {
        self.position_curve = SETTLE_CURVE;
        if self.value {
            self.position.forward();
        } else {
            self.position.reverse();
        }
    }

    fn emit_change(&self, next: bool) -> bool {
        tracing::debug!(from = self.value, to = next, "toggle value change requested");
        if let Some(on_changed) = &self.on_changed {
            on_changed(next);
        }
        next
    }

    fn emit_vibration(&self) {
        if self.platform.supports_haptics() {
            self.haptics.light_impact();
        }
    }
}

impl fmt::Debug for ToggleVisualController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleVisualController")
            .field("value", &self.value)
            .field("state", &self.state())
            .field("interactive", &self.is_interactive())
            .field("needs_settle", &self.needs_settle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use crate::testing::CountingHaptics;
    use tumbler_core::TargetPlatform;

    const INNER: f32 = 20.0;

    fn recording(value: bool) -> (ToggleVisualController, Rc<RefCell<Vec<bool>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut c = ToggleVisualController::new(value, INNER);
        c.set_on_changed(Some(Rc::new(move |v| sink.borrow_mut().push(v))));
        (c, calls)
    }

    fn settle(c: &mut ToggleVisualController) {
        while c.tick(0.016) {}
    }

    // ===== ToggleState Tests =====

    #[test]
    fn test_state_at_rest() {
        let off = ToggleState::at_rest(false);
        assert_eq!(off.position, 0.0);
        assert!(off.is_dismissed());
        let on = ToggleState::at_rest(true);
        assert_eq!(on.position, 1.0);
        assert!(on.is_completed());
    }

    #[test]
    fn test_controller_initial_state_matches_value() {
        assert_eq!(
            ToggleVisualController::new(true, INNER).state(),
            ToggleState::at_rest(true)
        );
        assert_eq!(
            ToggleVisualController::new(false, INNER).state(),
            ToggleState::at_rest(false)
        );
    }

    // ===== Drag Tests =====

    #[test]
    fn test_drag_update_moves_by_inner_length() {
        let (mut c, _) = recording(false);
        c.on_drag_start();
        c.on_drag_update(5.0, LayoutDirection::Ltr);
        assert!((c.state().position - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_drag_update_rtl_subtracts() {
        let (mut c, _) = recording(false);
        c.on_drag_update(10.0, LayoutDirection::Ltr);
        c.on_drag_update(4.0, LayoutDirection::Rtl);
        assert!((c.state().position - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_drag_update_clamps() {
        let (mut c, _) = recording(false);
        c.on_drag_update(500.0, LayoutDirection::Ltr);
        assert_eq!(c.state().position, 1.0);
        c.on_drag_update(-500.0, LayoutDirection::Ltr);
        assert_eq!(c.state().position, 0.0);
    }

    #[test]
    fn test_drag_update_drops_non_finite_delta() {
        let (mut c, calls) = recording(false);
        c.on_drag_start();
        c.on_drag_update(6.0, LayoutDirection::Ltr);
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            c.on_drag_update(bad, LayoutDirection::Ltr);
        }
        let state = c.state();
        assert!((state.position - 0.3).abs() < 1e-6);
        assert!(state.color_position.is_finite());
        assert_eq!(c.on_drag_end(), None);
        settle(&mut c);
        assert_eq!(c.state(), ToggleState::at_rest(false));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_drag_is_linear() {
        let (mut c, _) = recording(false);
        c.on_drag_update(3.0, LayoutDirection::Ltr);
        assert!((c.state().position - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_drag_end_crossing_emits_once_and_waits() {
        let (mut c, calls) = recording(false);
        c.on_drag_start();
        c.on_drag_update(14.0, LayoutDirection::Ltr);
        assert_eq!(c.on_drag_end(), Some(true));
        assert_eq!(*calls.borrow(), vec![true]);
        assert!(c.is_awaiting_confirmation());

        // The thumb holds where it was released until the caller confirms.
        settle(&mut c);
        assert!((c.state().position - 0.7).abs() < 1e-6);

        c.set_value(true);
        assert!(!c.is_awaiting_confirmation());
        settle(&mut c);
        assert_eq!(c.state().position, 1.0);
        assert!(c.state().is_completed());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_drag_end_rejected_by_caller_settles_back() {
        let (mut c, _) = recording(false);
        c.on_drag_update(14.0, LayoutDirection::Ltr);
        c.on_drag_end();
        c.set_value(false);
        settle(&mut c);
        assert_eq!(c.state().position, 0.0);
        assert!(c.state().is_dismissed());
    }

    #[test]
    fn test_drag_end_not_crossing_settles_immediately() {
        let (mut c, calls) = recording(false);
        c.on_drag_update(6.0, LayoutDirection::Ltr);
        assert_eq!(c.on_drag_end(), None);
        assert!(calls.borrow().is_empty());
        assert!(c.is_animating());
        settle(&mut c);
        assert_eq!(c.state().position, 0.0);
    }

    #[test]
    fn test_drag_end_restores_eased_curve() {
        let (mut c, _) = recording(false);
        c.on_drag_update(6.0, LayoutDirection::Ltr);
        c.on_drag_end();
        c.tick(0.01);
        // Reversing from 0.3 under ease-out: curved value sits above linear.
        let linear = c.position.value() as f32;
        assert!(c.state().position > linear);
    }

    #[test]
    fn test_drag_reaction_rises_and_falls() {
        let (mut c, _) = recording(false);
        c.on_drag_start();
        settle(&mut c);
        assert_eq!(c.state().reaction, 1.0);
        assert!(c.state().reaction_status.is_completed());
        c.on_drag_end();
        settle(&mut c);
        assert_eq!(c.state().reaction, 0.0);
        assert!(c.state().reaction_status.is_dismissed());
    }

    #[test]
    fn test_drag_cancel_settles_without_emitting() {
        let (mut c, calls) = recording(false);
        c.on_drag_start();
        c.on_drag_update(18.0, LayoutDirection::Ltr);
        c.on_drag_cancel();
        settle(&mut c);
        assert!(calls.borrow().is_empty());
        assert_eq!(c.state().position, 0.0);
        assert_eq!(c.state().reaction, 0.0);
    }

    // ===== Tap Tests =====

    #[test]
    fn test_tap_emits_flip_without_moving() {
        let (mut c, calls) = recording(true);
        assert_eq!(c.on_tap(), Some(false));
        assert_eq!(*calls.borrow(), vec![false]);
        settle(&mut c);
        assert_eq!(c.state().position, 1.0);

        c.set_value(false);
        settle(&mut c);
        assert_eq!(c.state().position, 0.0);
    }

    #[test]
    fn test_tap_down_and_cancel_drive_reaction() {
        let (mut c, _) = recording(false);
        c.on_tap_down();
        assert_eq!(c.state().reaction_status, AnimationStatus::Forward);
        c.on_tap_cancel();
        assert_eq!(c.state().reaction_status, AnimationStatus::Dismissed);
    }

    // ===== set_value Tests =====

    #[test]
    fn test_set_value_same_value_is_noop() {
        let (mut c, _) = recording(false);
        c.set_value(false);
        assert!(!c.is_animating());
    }

    #[test]
    fn test_set_value_animates_with_ease_in() {
        let (mut c, _) = recording(false);
        c.set_value(true);
        assert_eq!(c.state().position_status, AnimationStatus::Forward);
        c.tick(0.1);
        let p = c.state().position;
        assert!(p > 0.0 && p < 0.5, "ease-in lags linear, got {p}");
    }

    #[test]
    fn test_color_position_uses_ease_out_forward() {
        let (mut c, _) = recording(false);
        c.set_value(true);
        c.tick(0.1);
        let s = c.state();
        assert!(s.color_position > 0.5);
        assert!(s.color_position > s.position);
    }

    // ===== Disabled Tests =====

    #[test]
    fn test_disabled_ignores_everything() {
        let mut c = ToggleVisualController::new(false, INNER);
        assert!(!c.is_interactive());
        c.on_drag_start();
        c.on_drag_update(15.0, LayoutDirection::Ltr);
        assert_eq!(c.on_drag_end(), None);
        assert_eq!(c.on_tap(), None);
        c.on_tap_down();
        assert_eq!(c.state(), ToggleState::at_rest(false));
        assert!(!c.is_animating());
    }

    // ===== Haptics Tests =====

    #[test]
    fn test_haptics_on_ios_only() {
        let haptics = Rc::new(CountingHaptics::new());
        let (mut c, _) = recording(false);
        c.set_haptics(haptics.clone(), Platform::native(TargetPlatform::Ios));
        c.on_drag_start();
        c.on_tap();
        assert_eq!(haptics.impacts(), 2);

        c.set_platform(Platform::native(TargetPlatform::Android));
        c.on_drag_start();
        c.on_tap();
        assert_eq!(haptics.impacts(), 2);
    }

    // ===== Tick Tests =====

    #[test]
    fn test_tick_reports_idle_when_settled() {
        let (mut c, _) = recording(false);
        assert!(!c.tick(0.016));
        c.set_value(true);
        c.on_tap_down();
        assert!(c.tick(0.016));
        settle(&mut c);
        assert!(!c.tick(0.016));
        assert!(!c.is_animating());
    }

    proptest! {
        #[test]
        fn prop_drag_keeps_position_in_range(deltas in proptest::collection::vec(-40.0f32..40.0, 1..30)) {
            let (mut c, _) = recording(false);
            c.on_drag_start();
            for d in deltas {
                c.on_drag_update(d, LayoutDirection::Ltr);
                let p = c.state().position;
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }

        #[test]
        fn prop_drag_end_emits_iff_crossing(delta in 0.0f32..20.0) {
            let (mut c, calls) = recording(false);
            c.on_drag_update(delta, LayoutDirection::Ltr);
            let crossed = c.position.value() >= 0.5;
            let emitted = c.on_drag_end();
            prop_assert_eq!(emitted.is_some(), crossed);
            prop_assert_eq!(calls.borrow().len(), usize::from(crossed));
        }
    }
}
