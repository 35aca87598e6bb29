//! Plain-text export of a session, the block agents paste into account notes.
//!
//! Field order and placeholders must stay byte-for-byte stable so pasted
//! records remain comparable across versions.

use chrono::{DateTime, Local};

use super::Session;

/// Substituted for an empty account, name, or phone field
pub const NOT_PROVIDED: &str = "Not provided";

/// Substituted for empty comments
pub const NO_COMMENTS_PLACEHOLDER: &str = "No additional comments";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

impl Session {
    /// Render the export block. `now` supplies the date line; the time line is
    /// the call start time.
    pub fn export_session_text(&self, now: DateTime<Local>) -> String {
        let customer = self.customer();

        let mut text = String::new();
        text.push_str("XFINITY CALL INFORMATION\n");
        text.push_str("========================\n");
        text.push_str(&format!("Call #: {}\n", self.call_number()));
        text.push_str(&format!("Date: {}\n", now.format("%-m/%-d/%Y")));
        text.push_str(&format!(
            "Time: {}\n",
            self.started_at().format("%-I:%M:%S %p")
        ));
        text.push('\n');
        text.push_str("CUSTOMER DETAILS:\n");
        text.push_str(&format!(
            "Account Number: {}\n",
            or_placeholder(&customer.account_number, NOT_PROVIDED)
        ));
        text.push_str(&format!(
            "Customer Name: {}\n",
            or_placeholder(&customer.customer_name, NOT_PROVIDED)
        ));
        text.push_str(&format!(
            "Phone Number: {}\n",
            or_placeholder(&customer.phone_number, NOT_PROVIDED)
        ));
        text.push('\n');
        text.push_str("ADDITIONAL COMMENTS:\n");
        text.push_str(or_placeholder(&customer.comments, NO_COMMENTS_PLACEHOLDER));
        text.push('\n');
        text.push('\n');
        text.push_str("CALL PROGRESS:\n");
        text.push_str(&format!(
            "Completed Steps: {}/{}\n",
            self.completed_count(),
            self.total_count()
        ));
        text.push_str(&format!("Progress: {}%", self.rounded_progress()));
        text
    }
}
