use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use callsheet::clipboard::{self, Clipboard, ExportOutcome};
use callsheet::config::Config;
use callsheet::content::Content;
use callsheet::objections::ObjectionBrowser;
use callsheet::session::Session;
use callsheet::view::View;

use crate::ui::keybindings::{status_hint, ShortcutContext};
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::ui::{
    HeaderBar, HelpDialog, ManualCopyDialog, ObjectionsView, StatusBar, TrackerFocus, TrackerView,
};

/// Result of a background clipboard write, tagged with the call it belongs to
#[derive(Debug)]
struct ExportDelivery {
    call_number: u32,
    outcome: ExportOutcome,
}

pub struct App {
    config: Config,
    session: Session,
    browser: ObjectionBrowser,
    view: View,
    tracker: TrackerView,
    objections_view: ObjectionsView,
    help_dialog: HelpDialog,
    manual_copy: ManualCopyDialog,
    clipboard: Arc<dyn Clipboard>,
    export_tx: UnboundedSender<ExportDelivery>,
    export_rx: UnboundedReceiver<ExportDelivery>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, content: Content, clipboard: Arc<dyn Clipboard>) -> Self {
        let (export_tx, export_rx) = mpsc::unbounded_channel();

        tracing::info!(
            steps = content.steps.len(),
            objections = content.objections.len(),
            clipboard = %clipboard.name(),
            "Starting call session"
        );

        Self {
            config,
            session: Session::new(content.steps),
            browser: ObjectionBrowser::new(content.objections),
            view: View::default(),
            tracker: TrackerView::new(),
            objections_view: ObjectionsView::new(),
            help_dialog: HelpDialog::new(),
            manual_copy: ManualCopyDialog::new(),
            clipboard,
            export_tx,
            export_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let _guard = TerminalGuard::new()?;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let tick_rate = self.config.refresh_rate();

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c')
                        {
                            self.should_quit = true;
                        } else {
                            self.handle_key(key.code);
                        }
                    }
                }
            }

            self.drain_exports();
        }

        terminal.show_cursor()?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(10),   // Main content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        let started_at = self.session.started_at().format("%-I:%M:%S %p").to_string();
        HeaderBar {
            call_number: self.session.call_number(),
            started_at: &started_at,
            view: self.view,
            copied: self.session.is_copied(Instant::now()),
        }
        .render(frame, chunks[0]);

        match self.view {
            View::Tracker => self.tracker.render(frame, chunks[1], &self.session),
            View::Objections => self
                .objections_view
                .render(frame, chunks[1], &self.browser),
        }

        let hint = status_hint(self.shortcut_context());
        StatusBar { hint: &hint }.render(frame, chunks[2]);

        self.help_dialog.render(frame);
        self.manual_copy.render(frame);
    }

    fn shortcut_context(&self) -> ShortcutContext {
        if self.manual_copy.visible {
            return ShortcutContext::ManualCopy;
        }
        match (self.view, self.tracker.focus) {
            (View::Tracker, TrackerFocus::Checklist) => ShortcutContext::Checklist,
            (View::Tracker, TrackerFocus::CustomerForm) => ShortcutContext::CustomerForm,
            (View::Objections, _) => ShortcutContext::Objections,
        }
    }

    fn update_session(&mut self, transition: impl FnOnce(Session) -> Session) {
        let session = std::mem::take(&mut self.session);
        self.session = transition(session);
    }

    fn update_browser(&mut self, transition: impl FnOnce(ObjectionBrowser) -> ObjectionBrowser) {
        let browser = std::mem::take(&mut self.browser);
        self.browser = transition(browser);
    }

    fn handle_key(&mut self, key: KeyCode) {
        // Help dialog takes priority
        if self.help_dialog.visible {
            self.help_dialog.visible = false;
            return;
        }

        if self.manual_copy.visible {
            match key {
                KeyCode::Esc | KeyCode::Char('q') => self.manual_copy.hide(),
                KeyCode::Up | KeyCode::Char('k') => self.manual_copy.scroll_up(),
                KeyCode::Down | KeyCode::Char('j') => self.manual_copy.scroll_down(),
                _ => {}
            }
            return;
        }

        match self.view {
            View::Tracker => match self.tracker.focus {
                TrackerFocus::CustomerForm => self.handle_form_key(key),
                TrackerFocus::Checklist => self.handle_checklist_key(key),
            },
            View::Objections => self.handle_objections_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.tracker.focus_checklist(),
            KeyCode::Tab => self.tracker.form.next_field(),
            KeyCode::BackTab => self.tracker.form.prev_field(),
            _ => {
                if let Some((field, value)) = self.tracker.form.handle_key(key) {
                    self.update_session(|s| s.update_customer_info(field, value));
                }
            }
        }
    }

    fn handle_checklist_key(&mut self, key: KeyCode) {
        let step_count = self.session.total_count();
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Down | KeyCode::Char('j') => self.tracker.select_next(step_count),
            KeyCode::Up | KeyCode::Char('k') => self.tracker.select_prev(step_count),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.tracker.selected_step_id(&self.session) {
                    self.update_session(|s| s.toggle_step(&id));
                    if self.session.is_complete() {
                        tracing::info!(call = self.session.call_number(), "All call steps completed");
                    }
                }
            }
            KeyCode::Char('i') | KeyCode::Tab => self.tracker.focus_form(),
            KeyCode::Char('o') => self.switch_view(self.view.toggled()),
            KeyCode::Char('c') => self.start_export(),
            KeyCode::Char('N') => self.new_call(),
            _ => {}
        }
    }

    fn handle_objections_key(&mut self, key: KeyCode) {
        if self.objections_view.searching {
            if let Some(query) = self.objections_view.search_key(key, self.browser.query()) {
                self.update_browser(|b| b.with_query(query));
                let len = self.browser.filtered().len();
                self.objections_view.clamp(len);
            }
            return;
        }

        let len = self.browser.filtered().len();
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Down | KeyCode::Char('j') => self.objections_view.select_next(len),
            KeyCode::Up | KeyCode::Char('k') => self.objections_view.select_prev(len),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.objections_view.selected_id(&self.browser) {
                    self.update_browser(|b| b.toggle_expanded(&id));
                }
            }
            KeyCode::Char('/') => self.objections_view.start_search(),
            KeyCode::Char('t') | KeyCode::Esc => self.switch_view(self.view.toggled()),
            KeyCode::Char('c') => self.start_export(),
            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) {
        tracing::debug!(from = ?self.view, to = ?view, "Switching view");
        self.view = view;
    }

    fn new_call(&mut self) {
        self.update_session(Session::reset_session);
        self.tracker.reset(&self.session);
    }

    /// Export in the background; the outcome arrives through `drain_exports`
    fn start_export(&mut self) {
        let text = self.session.export_session_text(Local::now());
        let call_number = self.session.call_number();
        let clipboard = Arc::clone(&self.clipboard);
        let tx = self.export_tx.clone();

        tokio::spawn(async move {
            let outcome = clipboard::deliver(clipboard.as_ref(), text).await;
            // The receiver lives as long as the app; a send error means we're exiting
            let _ = tx.send(ExportDelivery {
                call_number,
                outcome,
            });
        });
    }

    fn drain_exports(&mut self) {
        while let Ok(delivery) = self.export_rx.try_recv() {
            if delivery.call_number != self.session.call_number() {
                tracing::debug!(
                    call = delivery.call_number,
                    "Dropping export result for a previous call"
                );
                continue;
            }

            if let ExportOutcome::ManualCopy(text) = delivery.outcome {
                self.manual_copy.show(text);
            }

            let window = self.config.copied_window();
            self.update_session(|s| s.mark_copied(Instant::now(), window));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use callsheet::clipboard::ClipboardError;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingClipboard {
        fail: bool,
        written: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clipboard for RecordingClipboard {
        fn name(&self) -> String {
            "recording".to_string()
        }

        async fn write(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn app_with(clipboard: Arc<RecordingClipboard>) -> App {
        App::new(Config::default(), Content::bundled(), clipboard)
    }

    fn app() -> App {
        app_with(Arc::new(RecordingClipboard::default()))
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key);
        }
    }

    async fn wait_for_export(app: &mut App) {
        for _ in 0..100 {
            app.drain_exports();
            if app.session.is_copied(Instant::now()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("export never completed");
    }

    #[test]
    fn test_space_toggles_selected_step() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Char('j'), KeyCode::Enter]);

        assert!(app.session.step("greeting").unwrap().completed);
        assert!(app.session.step("apology").unwrap().completed);
        assert_eq!(app.session.completed_count(), 2);
    }

    #[test]
    fn test_switching_views_keeps_session() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' ')]);

        press(&mut app, &[KeyCode::Char('o')]);
        assert_eq!(app.view, View::Objections);
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.view, View::Tracker);

        assert_eq!(app.session.completed_count(), 1);
        assert_eq!(app.session.call_number(), 1);
    }

    #[test]
    fn test_typing_updates_customer_info() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('i'),
                KeyCode::Char('4'),
                KeyCode::Char('2'),
                KeyCode::Tab,
                KeyCode::Char('q'),
                KeyCode::Esc,
            ],
        );

        assert_eq!(app.session.customer().account_number, "42");
        assert_eq!(app.session.customer().customer_name, "q");
        assert_eq!(app.tracker.focus, TrackerFocus::Checklist);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_new_call_resets_session_and_form() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char(' '),
                KeyCode::Char('i'),
                KeyCode::Char('9'),
                KeyCode::Esc,
                KeyCode::Char('N'),
            ],
        );

        assert_eq!(app.session.call_number(), 2);
        assert_eq!(app.session.completed_count(), 0);
        assert!(app.session.customer().is_empty());

        press(&mut app, &[KeyCode::Char('i'), KeyCode::Char('1')]);
        assert_eq!(app.session.customer().account_number, "1");
    }

    #[test]
    fn test_objection_expand_and_search() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('o'), KeyCode::Enter]);
        assert_eq!(app.browser.expanded_id(), Some("too-expensive"));

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.browser.expanded_id(), None);

        press(&mut app, &[KeyCode::Char('/')]);
        for c in "cancel".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter, KeyCode::Char(' ')]);
        assert_eq!(app.browser.query(), "cancel");
        assert_eq!(app.browser.expanded_id(), Some("want-to-cancel"));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('?')]);
        assert!(app.help_dialog.visible);
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.help_dialog.visible);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_export_copies_and_shows_indicator() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let mut app = app_with(Arc::clone(&clipboard));
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Char('c')]);

        wait_for_export(&mut app).await;
        assert!(!app.manual_copy.visible);

        let written = clipboard.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].contains("Completed Steps: 1/13"));
    }

    #[tokio::test]
    async fn test_export_failure_opens_manual_copy() {
        let clipboard = Arc::new(RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        });
        let mut app = app_with(clipboard);
        press(&mut app, &[KeyCode::Char('c')]);

        wait_for_export(&mut app).await;
        assert!(app.manual_copy.visible);
        assert!(app.manual_copy.text.contains("Account Number: Not provided"));

        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.manual_copy.visible);
        assert!(app.session.is_copied(Instant::now()));
    }

    #[tokio::test]
    async fn test_stale_export_result_is_dropped() {
        let mut app = app();
        app.export_tx
            .send(ExportDelivery {
                call_number: 1,
                outcome: ExportOutcome::ManualCopy("old".to_string()),
            })
            .unwrap();
        press(&mut app, &[KeyCode::Char('N')]);

        app.drain_exports();
        assert!(!app.manual_copy.visible);
        assert!(!app.session.is_copied(Instant::now()));
    }
}
