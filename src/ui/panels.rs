use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use callsheet::session::Category;
use callsheet::view::View;

/// Accent color per call category
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Opening => Color::Blue,
        Category::Connection => Color::Green,
        Category::Service => Color::Magenta,
        Category::Closing => Color::Red,
    }
}

pub struct HeaderBar<'a> {
    pub call_number: u32,
    pub started_at: &'a str,
    pub view: View,
    pub copied: bool,
}

impl HeaderBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let tab = |view: View| {
            if view == self.view {
                Span::styled(
                    format!(" {} ", view.title()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    format!(" {} ", view.title()),
                    Style::default().fg(Color::Gray),
                )
            }
        };

        let mut spans = vec![
            Span::styled(
                " Xfinity Call Tracker ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "Call #{} • Started at {}  ",
                self.call_number, self.started_at
            )),
            tab(View::Tracker),
            Span::raw(" "),
            tab(View::Objections),
        ];

        if self.copied {
            spans.push(Span::styled(
                "  ✓ Copied!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, area);
    }
}

pub struct ProgressPanel {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub rounded: u32,
}

impl ProgressPanel {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let ratio = (self.percentage / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(
                        " Call Progress: {} of {} completed ",
                        self.completed, self.total
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray)),
            )
            .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
            .ratio(ratio)
            .label(format!("{}%", self.rounded));
        frame.render_widget(gauge, area);
    }
}

pub struct StatusBar<'a> {
    pub hint: &'a str,
}

impl StatusBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let status = Paragraph::new(Line::from(vec![
            Span::styled(self.hint, Style::default().fg(Color::DarkGray)),
            Span::styled("  ? help", Style::default().fg(Color::Yellow)),
        ]))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(status, area);
    }
}
