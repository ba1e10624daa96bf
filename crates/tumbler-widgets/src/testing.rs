//! Test doubles shared by the unit tests.

use std::cell::Cell;
use tumbler_core::HapticFeedback;

/// Haptics that only count requests.
#[derive(Debug, Default)]
pub(crate) struct CountingHaptics {
    impacts: Cell<usize>,
}

impl CountingHaptics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn impacts(&self) -> usize {
        self.impacts.get()
    }
}

impl HapticFeedback for CountingHaptics {
    fn light_impact(&self) {
        self.impacts.set(self.impacts.get() + 1);
    }
}
