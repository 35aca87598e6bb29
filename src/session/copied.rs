//! Transient "copied" confirmation.

use std::time::{Duration, Instant};

/// How long the confirmation stays up after an export
pub const DEFAULT_COPIED_WINDOW: Duration = Duration::from_millis(2000);

/// Expires on its own; only a session reset clears it early.
///
/// Showing it again while visible restarts the window from the latest copy,
/// so back-to-back exports keep it up for a full window after the last one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopiedIndicator {
    visible_until: Option<Instant>,
}

impl CopiedIndicator {
    pub fn show(self, now: Instant, window: Duration) -> Self {
        Self {
            visible_until: now.checked_add(window),
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|until| now < until)
    }
}
