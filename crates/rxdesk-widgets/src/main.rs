//! RxDesk focus demo
//!
//! A page with a few focusable widgets and a modal dialog that traps focus.
//! Tab and Shift+Tab move focus, Enter activates, Esc closes the dialog,
//! `q` or Ctrl+C quits. Logs go to the cache directory, filtered by `RXDESK_LOG`.

use std::fs::{self, File};
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Clear, Paragraph},
    Frame, Terminal,
};
use rxdesk_focus::{FocusConfig, FocusableId};
use rxdesk_widgets::{
    event::{KEY_CODE_ENTER, KEY_CODE_SPACE},
    Button, ButtonProps, EventOutcome, Link, LinkProps, RootView, TextInput, TextInputProps,
    UiEvent, View, ViewProps,
};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

const IDLE_POLL: Duration = Duration::from_millis(250);

fn init_logging() -> Result<()> {
    let dir = dirs::cache_dir()
        .context("no cache directory on this platform")?
        .join("rxdesk");
    fs::create_dir_all(&dir)?;
    let file = File::create(dir.join("demo.log"))?;

    let filter = EnvFilter::try_from_env("RXDESK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

struct Dialog {
    view: View,
    ok: Button,
    cancel: Button,
}

struct DemoApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    root: RootView,
    save: Button,
    open_dialog: Button,
    name: TextInput,
    docs: Link,
    dialog: Option<Dialog>,
    status: String,
    running: bool,
}

impl DemoApp {
    fn new(config: FocusConfig) -> Result<Self> {
        let policy = config.tab_stop_revert;
        let mut root = RootView::new(config);

        let mut save = Button::new(ButtonProps::new("Save")).with_revert_policy(policy);
        let mut open_dialog = Button::new(ButtonProps::new("Open dialog")).with_revert_policy(policy);
        let mut name = TextInput::new(TextInputProps {
            placeholder: "Your name".to_string(),
            max_length: Some(32),
            ..TextInputProps::default()
        })
        .with_revert_policy(policy);
        let mut docs = Link::new(LinkProps::new("Documentation", "https://github.com/rxdesk/rxdesk"))
            .with_revert_policy(policy);

        let manager = root.focus_manager_mut();
        save.mount(manager, None);
        open_dialog.mount(manager, None);
        name.mount(manager, None);
        docs.mount(manager, None);

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            root,
            save,
            open_dialog,
            name,
            docs,
            dialog: None,
            status: "Press Tab to start navigating".to_string(),
            running: true,
        })
    }

    fn run(&mut self) -> Result<()> {
        while self.running {
            self.tick();
            self.draw()?;

            let timeout = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL)
                .min(IDLE_POLL);
            if event::poll(timeout)? {
                let raw = event::read()?;
                self.handle(&raw)?;
            }
        }
        Ok(())
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.root.focus_manager().next_deadline()
    }

    fn tick(&mut self) {
        self.root.process_deferred();
        let now = Instant::now();
        self.save.focus_handle().tick(now);
        self.open_dialog.focus_handle().tick(now);
        self.name.focus_handle().tick(now);
        self.docs.focus_handle().tick(now);
        if let Some(dialog) = &self.dialog {
            dialog.ok.focus_handle().tick(now);
            dialog.cancel.focus_handle().tick(now);
        }
    }

    fn handle(&mut self, raw: &Event) -> Result<()> {
        if let Event::Key(key) = raw {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.running = false;
                return Ok(());
            }
        }

        let event = UiEvent::from_crossterm(raw);
        if let EventOutcome::FocusMoved(id) = self.root.handle_event(&event) {
            tracing::debug!(id = %id, "Focus moved");
            return Ok(());
        }

        let UiEvent::KeyDown(kbd) = event else {
            return Ok(());
        };
        let focused = self.root.focus_manager().focused();

        if focused.is_some() && focused == self.name.id() && self.name.handle_key(&kbd.raw) {
            return Ok(());
        }
        if kbd.is_escape() {
            return self.close_dialog("Dialog dismissed");
        }
        if kbd.raw.code == KeyCode::Char('q') && self.dialog.is_none() {
            self.running = false;
            return Ok(());
        }
        if kbd.key_code == KEY_CODE_ENTER || kbd.key_code == KEY_CODE_SPACE {
            self.activate(focused)?;
        }
        Ok(())
    }

    fn activate(&mut self, focused: Option<FocusableId>) -> Result<()> {
        let Some(id) = focused else {
            return Ok(());
        };

        if let Some(dialog) = &self.dialog {
            if Some(id) == dialog.ok.id() {
                return self.close_dialog("Confirmed");
            }
            if Some(id) == dialog.cancel.id() {
                return self.close_dialog("Cancelled");
            }
            return Ok(());
        }

        if Some(id) == self.save.id() && self.save.press() {
            self.status = format!("Saved {:?}", self.name.value());
        } else if Some(id) == self.open_dialog.id() && self.open_dialog.press() {
            self.open_dialog()?;
        } else if Some(id) == self.docs.id() {
            self.status = format!("Opening {}", self.docs.activate());
        }
        Ok(())
    }

    fn open_dialog(&mut self) -> Result<()> {
        if self.dialog.is_some() {
            return Ok(());
        }
        let policy = self.root.focus_manager().config().tab_stop_revert;
        let manager = self.root.focus_manager_mut();

        let mut view = View::new(ViewProps {
            title: Some("Confirm".to_string()),
            restrict_focus_within: true,
            ..ViewProps::default()
        });
        view.mount(manager, None)?;
        let mut ok = Button::new(ButtonProps::new("OK")).with_revert_policy(policy);
        let mut cancel = Button::new(ButtonProps::new("Cancel")).with_revert_policy(policy);
        ok.mount(manager, view.child_scope());
        cancel.mount(manager, view.child_scope());
        view.did_mount_children(manager)?;

        self.dialog = Some(Dialog { view, ok, cancel });
        self.status = "Dialog open: focus is trapped".to_string();
        Ok(())
    }

    fn close_dialog(&mut self, status: &str) -> Result<()> {
        let Some(mut dialog) = self.dialog.take() else {
            return Ok(());
        };
        let manager = self.root.focus_manager_mut();
        dialog.ok.unmount(manager);
        dialog.cancel.unmount(manager);
        dialog.view.unmount(manager)?;
        if let Some(id) = self.root.restore_focus() {
            tracing::debug!(id = %id, "Focus restored after dialog");
        }
        self.status = status.to_string();
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let Self {
            terminal,
            root,
            save,
            open_dialog,
            name,
            docs,
            dialog,
            status,
            ..
        } = self;
        let mode = if root.is_navigating_with_keyboard() {
            "keyboard"
        } else {
            "pointer"
        };
        terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(frame.area());
            let buttons = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(16), Constraint::Length(16), Constraint::Min(0)])
                .split(rows[1]);

            frame.render_widget(Paragraph::new("RxDesk focus demo"), rows[0]);
            frame.render_widget(&*save, buttons[0]);
            frame.render_widget(&*open_dialog, buttons[1]);
            frame.render_widget(&*name, rows[2]);
            frame.render_widget(&*docs, rows[3]);
            frame.render_widget(
                Paragraph::new(format!("{} | navigation: {}", status, mode)),
                rows[5],
            );

            if let Some(dialog) = dialog.as_ref() {
                render_dialog(frame, dialog);
            }
        })?;
        Ok(())
    }
}

fn render_dialog(frame: &mut Frame, dialog: &Dialog) {
    let area = centered(frame.area(), 36, 7);
    frame.render_widget(Clear, area);
    frame.render_widget(&dialog.view, area);

    let inner = Rect::new(area.x + 1, area.y + 2, area.width.saturating_sub(2), 3);
    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    frame.render_widget(&dialog.ok, buttons[0]);
    frame.render_widget(&dialog.cancel, buttons[1]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Drop for DemoApp {
    fn drop(&mut self) {
        self.root.shutdown();
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let config = FocusConfig::load_or_default();
    tracing::info!(?config, "Starting RxDesk focus demo");

    let mut app = DemoApp::new(config)?;
    match app.run() {
        Ok(()) => {
            tracing::info!("Demo exited");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Demo error: {}", e);
            Err(e)
        }
    }
}
