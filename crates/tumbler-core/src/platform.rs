//! Host platform description and haptic feedback seam.

use serde::{Deserialize, Serialize};

/// Operating system family the host runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetPlatform {
    /// Android
    #[default]
    Android,
    /// iOS
    Ios,
    /// macOS
    MacOs,
    /// Linux desktop
    Linux,
    /// Windows desktop
    Windows,
    /// Fuchsia
    Fuchsia,
}

/// Where the widget tree is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Platform {
    /// Operating system family
    pub target: TargetPlatform,
    /// Running inside a browser
    #[serde(default)]
    pub web: bool,
}

impl Platform {
    /// A native (non-browser) platform.
    #[must_use]
    pub const fn native(target: TargetPlatform) -> Self {
        Self { target, web: false }
    }

    /// A browser host on the given operating system.
    #[must_use]
    pub const fn web(target: TargetPlatform) -> Self {
        Self { target, web: true }
    }

    /// Whether toggle gestures should request haptic feedback.
    #[must_use]
    pub const fn supports_haptics(&self) -> bool {
        !self.web && matches!(self.target, TargetPlatform::Ios)
    }
}

/// Haptic output provided by the host.
pub trait HapticFeedback {
    /// A light tap, used when a switch is grabbed or flipped.
    fn light_impact(&self);
}

/// Haptics for hosts without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn light_impact(&self) {}
}
