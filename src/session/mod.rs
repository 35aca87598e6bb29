//! Call session state model.
//!
//! A [`Session`] is an owned value. Every mutation is a consuming transition
//! (`self -> Self`), and every metric is derived from the flat step list on
//! read, so grouped views can never drift from the steps themselves.

mod copied;
mod export;

pub use copied::{CopiedIndicator, DEFAULT_COPIED_WINDOW};
pub use export::{NO_COMMENTS_PLACEHOLDER, NOT_PROVIDED};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Fixed partition of the call flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Opening,
    Connection,
    Service,
    Closing,
}

impl Category {
    /// Heading shown above the category's steps
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Opening => "Call Opening",
            Category::Connection => "Building Connection",
            Category::Service => "Service & Support",
            Category::Closing => "Call Closing",
        }
    }

    /// All categories in call order
    pub fn all() -> &'static [Category] {
        &[
            Category::Opening,
            Category::Connection,
            Category::Service,
            Category::Closing,
        ]
    }
}

/// One scripted talking point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStep {
    pub id: String,
    pub title: String,
    /// Script text read to the customer
    pub verbatim: String,
    pub category: Category,
    /// Only ever flipped by [`Session::toggle_step`]; never read from content files
    #[serde(skip)]
    pub completed: bool,
}

impl CallStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        verbatim: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            verbatim: verbatim.into(),
            category,
            completed: false,
        }
    }
}

/// Editable customer fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    AccountNumber,
    CustomerName,
    PhoneNumber,
    Comments,
}

impl CustomerField {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerField::AccountNumber => "Account Number",
            CustomerField::CustomerName => "Customer Name",
            CustomerField::PhoneNumber => "Phone Number",
            CustomerField::Comments => "Additional Comments",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CustomerField::AccountNumber => "Enter account number",
            CustomerField::CustomerName => "Enter customer name",
            CustomerField::PhoneNumber => "Enter phone number",
            CustomerField::Comments => {
                "Enter any additional notes or comments about this call..."
            }
        }
    }

    /// All fields in form order
    pub fn all() -> &'static [CustomerField] {
        &[
            CustomerField::AccountNumber,
            CustomerField::CustomerName,
            CustomerField::PhoneNumber,
            CustomerField::Comments,
        ]
    }
}

/// Free-text record for the active call. No field is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub account_number: String,
    pub customer_name: String,
    pub phone_number: String,
    pub comments: String,
}

impl CustomerInfo {
    pub fn get(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::AccountNumber => &self.account_number,
            CustomerField::CustomerName => &self.customer_name,
            CustomerField::PhoneNumber => &self.phone_number,
            CustomerField::Comments => &self.comments,
        }
    }

    fn slot_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::AccountNumber => &mut self.account_number,
            CustomerField::CustomerName => &mut self.customer_name,
            CustomerField::PhoneNumber => &mut self.phone_number,
            CustomerField::Comments => &mut self.comments,
        }
    }

    pub fn is_empty(&self) -> bool {
        CustomerField::all().iter().all(|f| self.get(*f).is_empty())
    }
}

/// Steps of one category, in the flat list's relative order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGroup<'a> {
    pub category: Category,
    pub steps: Vec<&'a CallStep>,
}

impl StepGroup<'_> {
    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Shown once every step of the call is complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub account_number: String,
    pub customer_name: String,
    pub phone_number: String,
    /// Omitted from the summary when nothing was entered
    pub comments: Option<String>,
    pub total_steps: usize,
}

/// The aggregate state of the call currently being worked
#[derive(Debug, Clone)]
pub struct Session {
    call_number: u32,
    started_at: DateTime<Local>,
    steps: Vec<CallStep>,
    customer: CustomerInfo,
    copied: CopiedIndicator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Session {
    /// Start the first call of a run with the given script
    pub fn new(steps: Vec<CallStep>) -> Self {
        Self::new_at(steps, Local::now())
    }

    /// Start the first call with an explicit start time
    pub fn new_at(steps: Vec<CallStep>, started_at: DateTime<Local>) -> Self {
        let steps = steps
            .into_iter()
            .map(|s| CallStep {
                completed: false,
                ..s
            })
            .collect();
        Self {
            call_number: 1,
            started_at,
            steps,
            customer: CustomerInfo::default(),
            copied: CopiedIndicator::default(),
        }
    }

    pub fn call_number(&self) -> u32 {
        self.call_number
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn steps(&self) -> &[CallStep] {
        &self.steps
    }

    pub fn step(&self, id: &str) -> Option<&CallStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Flip completion of the step with `id`; unknown ids leave the session untouched
    pub fn toggle_step(mut self, id: &str) -> Self {
        match self.steps.iter_mut().find(|s| s.id == id) {
            Some(step) => {
                step.completed = !step.completed;
                tracing::debug!(step = id, completed = step.completed, "Toggled call step");
            }
            None => {
                tracing::debug!(step = id, "Ignoring toggle for unknown call step");
            }
        }
        self
    }

    /// Replace exactly one customer field. Any string is accepted, including empty.
    pub fn update_customer_info(mut self, field: CustomerField, value: impl Into<String>) -> Self {
        *self.customer.slot_mut(field) = value.into();
        self
    }

    /// Begin the next call: counter + 1, steps cleared, customer cleared, new start time
    pub fn reset_session(self) -> Self {
        self.reset_session_at(Local::now())
    }

    pub fn reset_session_at(self, started_at: DateTime<Local>) -> Self {
        let call_number = self.call_number.saturating_add(1);
        tracing::info!(call = call_number, "Starting new call");

        let steps = self
            .steps
            .into_iter()
            .map(|s| CallStep {
                completed: false,
                ..s
            })
            .collect();

        Self {
            call_number,
            started_at,
            steps,
            customer: CustomerInfo::default(),
            copied: CopiedIndicator::default(),
        }
    }

    /// Show the "copied" confirmation for `window` starting at `now`
    pub fn mark_copied(mut self, now: Instant, window: Duration) -> Self {
        self.copied = self.copied.show(now, window);
        self
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied.is_visible(now)
    }

    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.steps.len()
    }

    /// Exact completion percentage; `0.0` for an empty script
    pub fn progress_percentage(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.completed_count() as f64 / total as f64 * 100.0
    }

    /// Percentage rounded for display (half away from zero)
    pub fn rounded_progress(&self) -> u32 {
        self.progress_percentage().round() as u32
    }

    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.completed_count() == self.total_count()
    }

    /// Group steps by category, categories in order of first appearance
    pub fn grouped_by_category(&self) -> Vec<StepGroup<'_>> {
        let mut groups: Vec<StepGroup<'_>> = Vec::new();
        for step in &self.steps {
            match groups.iter_mut().find(|g| g.category == step.category) {
                Some(group) => group.steps.push(step),
                None => groups.push(StepGroup {
                    category: step.category,
                    steps: vec![step],
                }),
            }
        }
        groups
    }

    /// Steps in the order the grouped checklist displays them
    pub fn display_order(&self) -> Vec<&CallStep> {
        self.grouped_by_category()
            .into_iter()
            .flat_map(|g| g.steps)
            .collect()
    }

    pub fn completion_summary(&self) -> Option<CompletionSummary> {
        if !self.is_complete() {
            return None;
        }

        let or_placeholder = |value: &str| {
            if value.is_empty() {
                NOT_PROVIDED.to_string()
            } else {
                value.to_string()
            }
        };

        Some(CompletionSummary {
            account_number: or_placeholder(&self.customer.account_number),
            customer_name: or_placeholder(&self.customer.customer_name),
            phone_number: or_placeholder(&self.customer.phone_number),
            comments: (!self.customer.comments.is_empty()).then(|| self.customer.comments.clone()),
            total_steps: self.total_count(),
        })
    }
}
