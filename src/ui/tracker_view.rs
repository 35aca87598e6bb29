//! Tracker view: customer info, progress, grouped checklist, and the
//! completion summary.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::form_field::CustomerForm;
use super::panels::{category_color, ProgressPanel};
use callsheet::session::{CompletionSummary, Session};

/// Which half of the tracker receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerFocus {
    Checklist,
    CustomerForm,
}

pub struct TrackerView {
    pub focus: TrackerFocus,
    pub form: CustomerForm,
    /// Index into the grouped display order
    selected: usize,
    list_state: ListState,
}

impl TrackerView {
    pub fn new() -> Self {
        Self {
            focus: TrackerFocus::Checklist,
            form: CustomerForm::new(),
            selected: 0,
            list_state: ListState::default(),
        }
    }

    /// Rebuild view state for a freshly reset session
    pub fn reset(&mut self, session: &Session) {
        self.form.load(session.customer());
        self.form.focus_first();
        self.focus = TrackerFocus::Checklist;
        self.selected = 0;
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, step_count: usize) {
        if step_count > 0 {
            self.selected = if self.selected >= step_count - 1 {
                0
            } else {
                self.selected + 1
            };
        }
    }

    pub fn select_prev(&mut self, step_count: usize) {
        if step_count > 0 {
            self.selected = if self.selected == 0 {
                step_count - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Id of the highlighted step
    pub fn selected_step_id(&self, session: &Session) -> Option<String> {
        session
            .display_order()
            .get(self.selected)
            .map(|s| s.id.clone())
    }

    pub fn focus_form(&mut self) {
        self.focus = TrackerFocus::CustomerForm;
    }

    pub fn focus_checklist(&mut self) {
        self.focus = TrackerFocus::Checklist;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, session: &Session) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.form.render_height()), // Customer info
                Constraint::Length(3),                         // Progress
                Constraint::Min(8),                            // Checklist + script
            ])
            .split(area);

        self.form
            .render(frame, chunks[0], self.focus == TrackerFocus::CustomerForm);

        ProgressPanel {
            completed: session.completed_count(),
            total: session.total_count(),
            percentage: session.progress_percentage(),
            rounded: session.rounded_progress(),
        }
        .render(frame, chunks[1]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[2]);

        self.render_checklist(frame, columns[0], session);

        match session.completion_summary() {
            Some(summary) => {
                let detail = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(4), Constraint::Length(9)])
                    .split(columns[1]);
                self.render_script(frame, detail[0], session);
                render_summary(frame, detail[1], &summary);
            }
            None => self.render_script(frame, columns[1], session),
        }
    }

    fn render_checklist(&mut self, frame: &mut Frame, area: Rect, session: &Session) {
        let focused = self.focus == TrackerFocus::Checklist;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut items = Vec::new();
        let mut highlighted = None;
        let mut step_index = 0;

        for group in session.grouped_by_category() {
            let color = category_color(group.category);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    group.category.display_name(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} of {} completed", group.completed_count(), group.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));

            for step in &group.steps {
                if step_index == self.selected {
                    highlighted = Some(items.len());
                }
                let (mark, style) = if step.completed {
                    ("[✓]", Style::default().fg(Color::Green))
                } else {
                    ("[ ]", Style::default().fg(Color::White))
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("  {mark} "), style),
                    Span::styled(step.title.as_str(), style),
                ])));
                step_index += 1;
            }
        }

        self.list_state.select(if focused { highlighted } else { None });

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Call Checklist ")
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_script(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let order = session.display_order();
        let Some(step) = order.get(self.selected) else {
            frame.render_widget(
                Block::default().title(" Script ").borders(Borders::ALL),
                area,
            );
            return;
        };

        let text_style = if step.completed {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    step.category.display_name(),
                    Style::default().fg(category_color(step.category)),
                ),
                Span::raw(if step.completed { "  ✓ done" } else { "" }),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Script: ",
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("\"{}\"", step.verbatim),
                    text_style.add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        let para = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", step.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }
}

impl Default for TrackerView {
    fn default() -> Self {
        Self::new()
    }
}

fn render_summary(frame: &mut Frame, area: Rect, summary: &CompletionSummary) {
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            "✓ Call Completed Successfully!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Account: ", label),
            Span::raw(summary.account_number.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Customer: ", label),
            Span::raw(summary.customer_name.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Phone: ", label),
            Span::raw(summary.phone_number.as_str()),
        ]),
    ];

    if let Some(comments) = &summary.comments {
        lines.push(Line::from(vec![
            Span::styled("Comments: ", label),
            Span::raw(comments.as_str()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "You've completed all {} steps of the Xfinity call structure. Great job following the professional protocol!",
            summary.total_steps
        ),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        "N start new call · c copy summary",
        Style::default().fg(Color::Yellow),
    )));

    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Call Summary ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}
