//! Objections view: searchable list with one expanded response at a time.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use callsheet::objections::ObjectionBrowser;

pub struct ObjectionsView {
    /// Keys go to the search query while true
    pub searching: bool,
    /// Index into the filtered list
    selected: usize,
    list_state: ListState,
}

impl ObjectionsView {
    pub fn new() -> Self {
        Self {
            searching: false,
            selected: 0,
            list_state: ListState::default(),
        }
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = if self.selected >= len - 1 {
                0
            } else {
                self.selected + 1
            };
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Keep the selection inside a list that just shrank
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn selected_id(&self, browser: &ObjectionBrowser) -> Option<String> {
        browser
            .filtered()
            .get(self.selected)
            .map(|o| o.id.clone())
    }

    pub fn start_search(&mut self) {
        self.searching = true;
    }

    /// Apply a key while searching. Returns the new query when it changed.
    /// Enter or Esc leaves search mode and keeps the query.
    pub fn search_key(&mut self, key: KeyCode, query: &str) -> Option<String> {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.searching = false;
                None
            }
            KeyCode::Char(c) => {
                let mut next = query.to_string();
                next.push(c);
                Some(next)
            }
            KeyCode::Backspace => {
                let mut next = query.to_string();
                next.pop().map(|_| next)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, browser: &ObjectionBrowser) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(6)])
            .split(area);

        self.render_search(frame, chunks[0], browser);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_list(frame, columns[0], browser);
        render_response(frame, columns[1], browser);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, browser: &ObjectionBrowser) {
        let query = browser.query();
        let content = if query.is_empty() && !self.searching {
            Line::from(Span::styled(
                "Press / to search objections",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut text = query.to_string();
            if self.searching {
                text.push('|');
            }
            Line::from(text)
        };

        let border = if self.searching {
            Color::Cyan
        } else {
            Color::Gray
        };
        let para = Paragraph::new(content).block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(para, area);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, browser: &ObjectionBrowser) {
        let filtered = browser.filtered();

        let items: Vec<ListItem> = filtered
            .iter()
            .map(|o| {
                let (marker, style) = if browser.is_expanded(&o.id) {
                    ("▾ ", Style::default().fg(Color::Cyan))
                } else {
                    ("▸ ", Style::default().fg(Color::White))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(o.objection.as_str(), style),
                ]))
            })
            .collect();

        self.list_state.select(if filtered.is_empty() {
            None
        } else {
            Some(self.selected.min(filtered.len() - 1))
        });

        let title = format!(
            " Objections ({}/{}) ",
            filtered.len(),
            browser.objections().len()
        );
        let border_style = if self.searching {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl Default for ObjectionsView {
    fn default() -> Self {
        Self::new()
    }
}

fn render_response(frame: &mut Frame, area: Rect, browser: &ObjectionBrowser) {
    let block = Block::default()
        .title(" Suggested Response ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let lines = match browser.expanded() {
        Some(objection) => vec![
            Line::from(Span::styled(
                format!("\"{}\"", objection.objection),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "Response: ",
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(objection.solution.as_str()),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Select an objection and press Enter to show the response.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsheet::content::Content;
    use ratatui::{backend::TestBackend, Terminal};

    fn browser() -> ObjectionBrowser {
        ObjectionBrowser::new(Content::bundled().objections)
    }

    #[test]
    fn test_search_key_edits_query() {
        let mut view = ObjectionsView::new();
        view.start_search();

        assert_eq!(
            view.search_key(KeyCode::Char('t'), "cos"),
            Some("cost".to_string())
        );
        assert_eq!(
            view.search_key(KeyCode::Backspace, "cost"),
            Some("cos".to_string())
        );
        assert_eq!(view.search_key(KeyCode::Backspace, ""), None);
        assert!(view.searching);

        assert_eq!(view.search_key(KeyCode::Enter, "cos"), None);
        assert!(!view.searching);
    }

    #[test]
    fn test_clamp_after_filter() {
        let mut view = ObjectionsView::new();
        for _ in 0..5 {
            view.select_next(8);
        }
        view.clamp(2);
        assert_eq!(view.selected(), 1);
        view.clamp(0);
        assert_eq!(view.selected(), 0);
    }

    #[test]
    fn test_selected_id_uses_filtered_list() {
        let view = ObjectionsView::new();
        let b = browser().with_query("internet");
        assert_eq!(view.selected_id(&b).as_deref(), Some("slow-internet"));
    }

    #[test]
    fn test_render_shows_expanded_response() {
        let b = browser().toggle_expanded("no-time");
        let mut view = ObjectionsView::new();
        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, &b);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Objections (8/8)"));
        assert!(text.contains("Response:"));
    }
}
