//! Text input widgets and the customer info form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use callsheet::session::{CustomerField, CustomerInfo};

/// A form field widget
pub enum FormField {
    /// Single-line text input
    TextInput {
        value: String,
        /// Cursor position in chars
        cursor_pos: usize,
        placeholder: String,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
}

fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map_or(value.len(), |(i, _)| i)
}

impl FormField {
    pub fn text_input(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn text_area(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.to_string(),
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    /// Handle a key event, returns true if the value changed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => match key {
                KeyCode::Char(c) => {
                    value.insert(byte_index(value, *cursor_pos), c);
                    *cursor_pos += 1;
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos == 0 {
                        return false;
                    }
                    *cursor_pos -= 1;
                    value.remove(byte_index(value, *cursor_pos));
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos >= value.chars().count() {
                        return false;
                    }
                    value.remove(byte_index(value, *cursor_pos));
                    true
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    false
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    false
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    false
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                // TextArea handles its own key events
                textarea.input(KeyEvent::new(key, KeyModifiers::NONE))
            }
        }
    }

    /// Rows needed to render this field, including its border
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 3,
            FormField::TextArea { .. } => 6,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor_pos), '|');
                    }
                    Line::from(text)
                };

                let para = Paragraph::new(content)
                    .block(block)
                    .style(Style::default().fg(if focused {
                        Color::White
                    } else {
                        Color::Gray
                    }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(block);
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
        }
    }
}

/// Editing buffer for [`CustomerInfo`].
///
/// The session stays authoritative: every edit is reported back as a
/// `(field, value)` pair and the form is rebuilt from the session on reset.
pub struct CustomerForm {
    fields: Vec<(CustomerField, FormField)>,
    focused_index: usize,
}

impl CustomerForm {
    pub fn new() -> Self {
        let fields = CustomerField::all()
            .iter()
            .map(|f| {
                let widget = match f {
                    CustomerField::Comments => FormField::text_area(f.placeholder()),
                    _ => FormField::text_input(f.placeholder()),
                };
                (*f, widget)
            })
            .collect();

        Self {
            fields,
            focused_index: 0,
        }
    }

    /// Overwrite every widget with the session's values
    pub fn load(&mut self, info: &CustomerInfo) {
        for (field, widget) in &mut self.fields {
            widget.set_value(info.get(*field));
        }
    }

    #[cfg(test)]
    pub fn focused_field(&self) -> CustomerField {
        self.fields[self.focused_index].0
    }

    pub fn next_field(&mut self) {
        self.focused_index = (self.focused_index + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused_index = if self.focused_index == 0 {
            self.fields.len() - 1
        } else {
            self.focused_index - 1
        };
    }

    pub fn focus_first(&mut self) {
        self.focused_index = 0;
    }

    /// Feed a key to the focused widget. Returns the edit to apply to the session.
    ///
    /// Enter in a single-line field moves to the next field.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<(CustomerField, String)> {
        let (field, widget) = &mut self.fields[self.focused_index];
        if key == KeyCode::Enter && matches!(widget, FormField::TextInput { .. }) {
            self.next_field();
            return None;
        }

        if widget.handle_key(key) {
            Some((*field, widget.value()))
        } else {
            None
        }
    }

    /// Rows needed to render the whole form
    pub fn render_height(&self) -> u16 {
        let inputs = self
            .fields
            .iter()
            .filter(|(_, w)| matches!(w, FormField::TextInput { .. }))
            .map(|(_, w)| w.render_height())
            .max()
            .unwrap_or(0);
        let areas: u16 = self
            .fields
            .iter()
            .filter(|(_, w)| matches!(w, FormField::TextArea { .. }))
            .map(|(_, w)| w.render_height())
            .sum();
        inputs + areas
    }

    /// Single-line fields share one row; the comments area spans below
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let input_count = self
            .fields
            .iter()
            .filter(|(_, w)| matches!(w, FormField::TextInput { .. }))
            .count()
            .max(1) as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, input_count); input_count as usize])
            .split(rows[0]);

        let focused_index = self.focused_index;
        let mut column = 0;
        for (i, (field, widget)) in self.fields.iter_mut().enumerate() {
            let is_focused = focused && i == focused_index;
            match widget {
                FormField::TextInput { .. } => {
                    if let Some(cell) = columns.get(column) {
                        widget.render(frame, *cell, field.label(), is_focused);
                    }
                    column += 1;
                }
                FormField::TextArea { .. } => {
                    widget.render(frame, rows[1], field.label(), is_focused);
                }
            }
        }
    }
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_handles_chars() {
        let mut field = FormField::text_input("test");

        assert!(field.handle_key(KeyCode::Char('h')));
        assert!(field.handle_key(KeyCode::Char('i')));
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn test_text_input_cursor_movement_does_not_report_change() {
        let mut field = FormField::text_input("test");
        field.set_value("abc");

        assert!(!field.handle_key(KeyCode::Left));
        assert!(field.handle_key(KeyCode::Backspace));
        assert_eq!(field.value(), "ac");
    }

    #[test]
    fn test_text_input_multibyte_chars() {
        let mut field = FormField::text_input("test");
        field.set_value("José");
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "Jos");
        field.handle_key(KeyCode::Char('é'));
        field.handle_key(KeyCode::Home);
        field.handle_key(KeyCode::Delete);
        assert_eq!(field.value(), "osé");
    }

    #[test]
    fn test_backspace_at_start_is_not_a_change() {
        let mut field = FormField::text_input("test");
        assert!(!field.handle_key(KeyCode::Backspace));
    }

    #[test]
    fn test_form_reports_edits_for_focused_field() {
        let mut form = CustomerForm::new();
        assert_eq!(form.focused_field(), CustomerField::AccountNumber);

        let edit = form.handle_key(KeyCode::Char('7'));
        assert_eq!(edit, Some((CustomerField::AccountNumber, "7".to_string())));

        form.next_field();
        let edit = form.handle_key(KeyCode::Char('A'));
        assert_eq!(edit, Some((CustomerField::CustomerName, "A".to_string())));
    }

    #[test]
    fn test_enter_advances_single_line_field() {
        let mut form = CustomerForm::new();
        assert_eq!(form.handle_key(KeyCode::Enter), None);
        assert_eq!(form.focused_field(), CustomerField::CustomerName);
    }

    #[test]
    fn test_field_focus_wraps() {
        let mut form = CustomerForm::new();
        form.prev_field();
        assert_eq!(form.focused_field(), CustomerField::Comments);
        form.next_field();
        assert_eq!(form.focused_field(), CustomerField::AccountNumber);
    }

    #[test]
    fn test_comments_accept_newlines() {
        let mut form = CustomerForm::new();
        form.prev_field();
        form.handle_key(KeyCode::Char('a'));
        form.handle_key(KeyCode::Enter);
        let edit = form.handle_key(KeyCode::Char('b'));
        assert_eq!(edit, Some((CustomerField::Comments, "a\nb".to_string())));
    }

    #[test]
    fn test_load_replaces_values() {
        let mut form = CustomerForm::new();
        form.handle_key(KeyCode::Char('x'));

        let info = CustomerInfo {
            customer_name: "Lin".to_string(),
            ..CustomerInfo::default()
        };
        form.load(&info);

        assert_eq!(form.fields[0].1.value(), "");
        assert_eq!(form.fields[1].1.value(), "Lin");
    }
}
