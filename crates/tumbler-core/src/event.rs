//! Input events delivered to widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// Pointer entered the widget
    MouseEnter,
    /// Pointer left the widget
    MouseLeave,
    /// Horizontal drag recognized by the host's gesture arena
    GesturePan {
        /// Translation since the previous pan event
        delta: Point,
        /// Velocity in pixels per second
        velocity: Point,
        /// Gesture state
        state: GestureState,
    },
    /// Tap recognized by the host's gesture arena
    GestureTap {
        /// Position
        position: Point,
        /// Number of taps (1 = single, 2 = double)
        count: u8,
    },
}

impl Event {
    /// Check if this is a mouse event.
    #[must_use]
    pub const fn is_mouse(&self) -> bool {
        matches!(
            self,
            Self::MouseMove { .. }
                | Self::MouseDown { .. }
                | Self::MouseUp { .. }
                | Self::MouseEnter
                | Self::MouseLeave
        )
    }

    /// Check if this is a keyboard event.
    #[must_use]
    pub const fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. })
    }

    /// Check if this is a gesture event.
    #[must_use]
    pub const fn is_gesture(&self) -> bool {
        matches!(self, Self::GesturePan { .. } | Self::GestureTap { .. })
    }

    /// Get the position if this is a positional event.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. }
            | Self::GestureTap { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// State of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GestureState {
    /// Gesture started
    #[default]
    Started,
    /// Gesture in progress (changed)
    Changed,
    /// Gesture ended
    Ended,
    /// Gesture cancelled
    Cancelled,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard keys widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return
    Enter,
    /// Space bar
    Space,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl Key {
    /// Keys that activate a focused control.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Ambient reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Left-to-right
    #[default]
    Ltr,
    /// Right-to-left
    Rtl,
}

impl LayoutDirection {
    /// Whether layout runs right-to-left.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    /// Map a logical `[0, 1]` progress to its on-screen position.
    #[must_use]
    pub fn visual(self, t: f32) -> f32 {
        match self {
            Self::Ltr => t,
            Self::Rtl => 1.0 - t,
        }
    }

    /// Map a horizontal pixel delta to its logical sign.
    #[must_use]
    pub fn logical_delta(self, dx: f32) -> f32 {
        match self {
            Self::Ltr => dx,
            Self::Rtl => -dx,
        }
    }
}

/// Pointer cursor a widget asks the host to show while hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MouseCursor {
    /// Platform default arrow
    #[default]
    Basic,
    /// Hand/pointer used for clickable things
    Click,
}
