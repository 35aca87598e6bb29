//! Top-level view selection. Switching views never touches the session.

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Checklist, customer info, and progress
    #[default]
    Tracker,
    /// Objection-handling reference
    Objections,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Tracker => "Call Tracker",
            View::Objections => "Objections",
        }
    }

    /// The other view
    pub fn toggled(&self) -> Self {
        match self {
            View::Tracker => View::Objections,
            View::Objections => View::Tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tracker() {
        assert_eq!(View::default(), View::Tracker);
    }

    #[test]
    fn test_toggled_round_trips() {
        assert_eq!(View::Tracker.toggled(), View::Objections);
        assert_eq!(View::Tracker.toggled().toggled(), View::Tracker);
    }
}
