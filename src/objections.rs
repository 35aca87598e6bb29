//! Objection-handling reference with search and single-entry expansion.

use serde::{Deserialize, Serialize};

/// A customer pushback prompt and the suggested response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objection {
    pub id: String,
    pub objection: String,
    pub solution: String,
}

impl Objection {
    pub fn new(
        id: impl Into<String>,
        objection: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            objection: objection.into(),
            solution: solution.into(),
        }
    }

    /// Case-insensitive match against the prompt or the response
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.objection.to_lowercase().contains(&query)
            || self.solution.to_lowercase().contains(&query)
    }
}

/// Read-only objection table plus the view state over it.
///
/// At most one entry is expanded at a time.
#[derive(Debug, Clone, Default)]
pub struct ObjectionBrowser {
    objections: Vec<Objection>,
    expanded: Option<String>,
    query: String,
}

impl ObjectionBrowser {
    pub fn new(objections: Vec<Objection>) -> Self {
        Self {
            objections,
            expanded: None,
            query: String::new(),
        }
    }

    pub fn objections(&self) -> &[Objection] {
        &self.objections
    }

    /// Expand `id`, or collapse it if it is already the expanded entry.
    /// Unknown ids leave the selection unchanged.
    pub fn toggle_expanded(mut self, id: &str) -> Self {
        if !self.objections.iter().any(|o| o.id == id) {
            tracing::debug!(objection = id, "Ignoring expand for unknown objection");
            return self;
        }

        self.expanded = if self.expanded.as_deref() == Some(id) {
            None
        } else {
            Some(id.to_string())
        };
        self
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn expanded(&self) -> Option<&Objection> {
        let id = self.expanded.as_deref()?;
        self.objections.iter().find(|o| o.id == id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query. The expanded entry is kept even if filtered out.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Entries matching the current query, in table order
    pub fn filtered(&self) -> Vec<&Objection> {
        self.objections
            .iter()
            .filter(|o| o.matches(&self.query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;

    fn browser() -> ObjectionBrowser {
        ObjectionBrowser::new(Content::bundled().objections)
    }

    #[test]
    fn test_nothing_expanded_initially() {
        assert!(browser().expanded().is_none());
    }

    #[test]
    fn test_toggle_same_id_twice_collapses() {
        let b = browser().toggle_expanded("no-time");
        assert_eq!(b.expanded_id(), Some("no-time"));

        let b = b.toggle_expanded("no-time");
        assert_eq!(b.expanded_id(), None);
    }

    #[test]
    fn test_toggle_other_id_switches_expansion() {
        let b = browser()
            .toggle_expanded("no-time")
            .toggle_expanded("think-about-it");
        assert_eq!(b.expanded_id(), Some("think-about-it"));
        assert!(!b.is_expanded("no-time"));
        assert_eq!(b.expanded().unwrap().id, "think-about-it");
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let b = browser()
            .toggle_expanded("no-time")
            .toggle_expanded("missing");
        assert_eq!(b.expanded_id(), Some("no-time"));
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let b = browser().with_query("   ");
        let ids: Vec<_> = b.filtered().iter().map(|o| o.id.as_str()).collect();
        let all: Vec<_> = b.objections().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, all);
    }

    #[test]
    fn test_query_matches_prompt_case_insensitively() {
        let b = browser().with_query("CANCEL");
        let ids: Vec<_> = b.filtered().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["want-to-cancel"]);
    }

    #[test]
    fn test_query_matches_solution_text() {
        let b = browser().with_query("callback");
        let ids: Vec<_> = b.filtered().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["no-time"]);
    }

    #[test]
    fn test_query_keeps_expanded_selection() {
        let b = browser()
            .toggle_expanded("slow-internet")
            .with_query("cancel");
        assert!(b.filtered().iter().all(|o| o.id != "slow-internet"));
        assert_eq!(b.expanded_id(), Some("slow-internet"));
    }
}
