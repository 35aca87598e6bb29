//! Manual copy dialog, shown when the system clipboard refuses an export.
//!
//! Mouse capture is never enabled, so the terminal's own selection works on
//! the text shown here.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

pub struct ManualCopyDialog {
    pub visible: bool,
    pub text: String,
    pub scroll: u16,
    /// Text rows inside the border at the last render
    viewport_height: u16,
}

impl ManualCopyDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            text: String::new(),
            scroll: 0,
            viewport_height: 0,
        }
    }

    pub fn show(&mut self, text: String) {
        self.text = text;
        self.scroll = 0;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.text.clear();
    }

    /// Export text plus the blank line and hint below it
    fn total_lines(&self) -> u16 {
        self.text.lines().count() as u16 + 2
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.total_lines().saturating_sub(self.viewport_height);
        if self.scroll < max_scroll {
            self.scroll += 1;
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Copy Call Info ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        self.viewport_height = block.inner(area).height;

        // Plain lines, no styling, so a terminal selection copies clean text
        let mut lines: Vec<Line> = self.text.lines().map(Line::raw).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Clipboard unavailable: select the text above to copy it. Esc to close.",
            Style::default().fg(Color::Yellow),
        )));

        let para = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll, 0));

        frame.render_widget(para, area);
    }
}
