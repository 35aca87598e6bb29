//! End-to-end call scenarios against the library crate
//!
//! Each test walks a session the way an agent would during a call: fill in the
//! customer, tick steps, export, start the next call.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use callsheet::clipboard::{deliver, Clipboard, ClipboardError, ExportOutcome};
use callsheet::content::Content;
use callsheet::objections::ObjectionBrowser;
use callsheet::session::{Category, CustomerField, Session};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn fresh_session() -> Session {
    let started = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    Session::new_at(Content::bundled().steps, started)
}

fn complete_first(session: Session, n: usize) -> Session {
    let ids: Vec<String> = session
        .display_order()
        .iter()
        .take(n)
        .map(|s| s.id.clone())
        .collect();
    ids.iter().fold(session, |s, id| s.toggle_step(id))
}

struct FakeClipboard {
    available: bool,
    contents: Mutex<Option<String>>,
}

impl FakeClipboard {
    fn new(available: bool) -> Self {
        Self {
            available,
            contents: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    fn name(&self) -> String {
        "fake".to_string()
    }

    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        if !self.available {
            return Err(ClipboardError::Unavailable("permission denied".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

// ─── Progress ────────────────────────────────────────────────────────────────

#[test]
fn fresh_call_has_no_progress() {
    let session = fresh_session();
    assert_eq!(session.call_number(), 1);
    assert_eq!(session.completed_count(), 0);
    assert_eq!(session.total_count(), 13);
    assert_eq!(session.rounded_progress(), 0);
    assert!(!session.is_complete());
    assert!(session.completion_summary().is_none());
}

#[test]
fn seven_of_thirteen_rounds_to_54_percent() {
    let session = complete_first(fresh_session(), 7);
    assert_eq!(session.completed_count(), 7);
    assert_eq!(session.rounded_progress(), 54);
}

#[test]
fn toggling_twice_restores_progress() {
    let session = fresh_session().toggle_step("rapport").toggle_step("rapport");
    assert_eq!(session.completed_count(), 0);
}

#[test]
fn unknown_step_is_ignored() {
    let session = fresh_session().toggle_step("no-such-step");
    assert_eq!(session.completed_count(), 0);
    assert_eq!(session.total_count(), 13);
}

// ─── Grouping ────────────────────────────────────────────────────────────────

#[test]
fn groups_partition_every_step_once() {
    let session = complete_first(fresh_session(), 4);
    let groups = session.grouped_by_category();

    let categories: Vec<Category> = groups.iter().map(|g| g.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Opening,
            Category::Connection,
            Category::Service,
            Category::Closing
        ]
    );

    let mut seen = HashSet::new();
    for group in &groups {
        assert!(!group.is_empty());
        for step in &group.steps {
            assert_eq!(step.category, group.category);
            assert!(seen.insert(step.id.clone()), "{} listed twice", step.id);
        }
    }
    assert_eq!(seen.len(), session.total_count());

    let grouped_completed: usize = groups.iter().map(|g| g.completed_count()).sum();
    assert_eq!(grouped_completed, session.completed_count());
}

// ─── Completion & Export ─────────────────────────────────────────────────────

#[test]
fn completed_call_shows_summary_with_placeholders() {
    let session = complete_first(fresh_session(), 13)
        .update_customer_info(CustomerField::CustomerName, "Dana Reyes");

    assert!(session.is_complete());
    let summary = session.completion_summary().expect("summary once complete");
    assert_eq!(summary.customer_name, "Dana Reyes");
    assert_eq!(summary.account_number, "Not provided");
    assert_eq!(summary.phone_number, "Not provided");
    assert!(summary.comments.is_none());
    assert_eq!(summary.total_steps, 13);
}

#[test]
fn export_of_untouched_call_uses_placeholders() {
    let now = Local.with_ymd_and_hms(2024, 1, 15, 10, 45, 0).unwrap();
    let text = fresh_session().export_session_text(now);

    assert!(text.starts_with("XFINITY CALL INFORMATION\n"));
    assert!(text.contains("Call #: 1\n"));
    assert!(text.contains("Date: 1/15/2024\n"));
    assert!(text.contains("Time: 10:30:00 AM\n"));
    assert!(text.contains("Account Number: Not provided\n"));
    assert!(text.contains("Customer Name: Not provided\n"));
    assert!(text.contains("Phone Number: Not provided\n"));
    assert!(text.contains("ADDITIONAL COMMENTS:\nNo additional comments\n"));
    assert!(text.ends_with("Completed Steps: 0/13\nProgress: 0%"));
}

#[test]
fn export_reflects_customer_and_progress() {
    let now = Local.with_ymd_and_hms(2024, 1, 15, 10, 45, 0).unwrap();
    let session = complete_first(fresh_session(), 7)
        .update_customer_info(CustomerField::AccountNumber, "8772-114")
        .update_customer_info(CustomerField::Comments, "Wants a callback\nafter 5pm");

    let text = session.export_session_text(now);
    assert!(text.contains("Account Number: 8772-114\n"));
    assert!(text.contains("ADDITIONAL COMMENTS:\nWants a callback\nafter 5pm\n"));
    assert!(text.ends_with("Completed Steps: 7/13\nProgress: 54%"));
}

#[test]
fn new_call_clears_everything_but_the_counter() {
    let session = complete_first(fresh_session(), 13)
        .update_customer_info(CustomerField::PhoneNumber, "555-0100")
        .mark_copied(Instant::now(), Duration::from_secs(2))
        .reset_session();

    assert_eq!(session.call_number(), 2);
    assert_eq!(session.completed_count(), 0);
    assert!(session.customer().is_empty());
    assert!(!session.is_copied(Instant::now()));
    assert_eq!(session.total_count(), 13);
}

// ─── Objections ──────────────────────────────────────────────────────────────

#[test]
fn only_one_objection_expanded_at_a_time() {
    let browser = ObjectionBrowser::new(Content::bundled().objections)
        .toggle_expanded("too-expensive")
        .toggle_expanded("no-time");
    assert_eq!(browser.expanded_id(), Some("no-time"));
    assert!(!browser.is_expanded("too-expensive"));

    let browser = browser.toggle_expanded("no-time");
    assert_eq!(browser.expanded_id(), None);
}

#[test]
fn search_narrows_objections_case_insensitively() {
    let browser = ObjectionBrowser::new(Content::bundled().objections).with_query("PRICE");
    let ids: Vec<&str> = browser.filtered().iter().map(|o| o.id.as_str()).collect();
    assert!(ids.contains(&"price-increase"));
    assert!(ids.len() < browser.objections().len());
}

// ─── Clipboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn export_lands_on_clipboard() {
    let clipboard = FakeClipboard::new(true);
    let text = fresh_session().export_session_text(Local::now());

    let outcome = deliver(&clipboard, text.clone()).await;
    assert_eq!(outcome, ExportOutcome::Copied);
    assert_eq!(clipboard.contents.lock().unwrap().as_deref(), Some(text.as_str()));
}

#[tokio::test]
async fn refused_clipboard_falls_back_to_manual_copy() {
    let clipboard = FakeClipboard::new(false);
    let text = fresh_session().export_session_text(Local::now());

    let outcome = deliver(&clipboard, text.clone()).await;
    assert_eq!(outcome, ExportOutcome::ManualCopy(text));
    assert!(clipboard.contents.lock().unwrap().is_none());
}
