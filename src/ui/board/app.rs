//! Interactive board application: terminal lifecycle, key handling,
//! and live reload when the board file changes on disk.
//!
//! All store I/O happens on the main loop; the watcher thread only
//! signals that a reload is due.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::service::TaskService;
use crate::session::{Page, Session};
use crate::task::{Area, Board};

use super::actions::{self, NewTaskInput};
use super::input::LineInput;
use super::view;

const EVENT_POLL_MS: u64 = 120;
const WATCH_DEBOUNCE_MS: u64 = 200;

pub(crate) enum UiMsg {
    Changed,
    WatchError(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) enum Overlay {
    Login(LineInput),
    NewTask { input: LineInput, area: Area },
}

pub struct AppState {
    pub(crate) session: Session,
    pub(crate) board: Board,
    pub(crate) focus: Area,
    /// Per-area cursor position, indexed by [`area_index`].
    pub(crate) selected: [usize; 4],
    pub(crate) chat_input: LineInput,
    /// Chat scroll offset, in lines from the bottom.
    pub(crate) chat_scroll: usize,
    pub(crate) overlay: Option<Overlay>,
    pub(crate) status_message: Option<(StatusKind, String)>,
    pub(crate) watch_error: Option<String>,
    service: TaskService,
}

pub(crate) fn area_index(area: Area) -> usize {
    Area::ALL.iter().position(|a| *a == area).unwrap_or(0)
}

fn next_area(area: Area) -> Area {
    Area::ALL[(area_index(area) + 1) % Area::ALL.len()]
}

fn prev_area(area: Area) -> Area {
    Area::ALL[(area_index(area) + Area::ALL.len() - 1) % Area::ALL.len()]
}

impl AppState {
    fn new(service: TaskService, session: Session) -> Result<Self> {
        let board = service.board()?;
        let overlay = if session.is_logged_in() {
            None
        } else {
            Some(Overlay::Login(LineInput::new()))
        };
        Ok(Self {
            session,
            board,
            focus: Area::Idea,
            selected: [0; 4],
            chat_input: LineInput::new(),
            chat_scroll: 0,
            overlay,
            status_message: None,
            watch_error: None,
            service,
        })
    }

    fn reload(&mut self) {
        match self.service.board() {
            Ok(board) => {
                self.board = board;
                self.clamp_selection();
            }
            Err(err) => self.set_error(format!("reload failed: {err}")),
        }
    }

    fn clamp_selection(&mut self) {
        for area in Area::ALL {
            let len = self.board.in_area(area).len();
            let idx = area_index(area);
            if len == 0 {
                self.selected[idx] = 0;
            } else if self.selected[idx] >= len {
                self.selected[idx] = len - 1;
            }
        }
    }

    pub(crate) fn selected_in(&self, area: Area) -> usize {
        self.selected[area_index(area)]
    }

    fn selected_task_id(&self) -> Option<String> {
        let tasks = self.board.in_area(self.focus);
        tasks
            .get(self.selected_in(self.focus))
            .map(|task| task.id.clone())
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some((StatusKind::Error, message));
    }

    fn set_info(&mut self, message: String) {
        self.status_message = Some((StatusKind::Info, message));
    }

    /// Apply an action result: refresh on success, report on failure.
    fn apply(&mut self, result: Result<actions::ActionOutcome>) -> Option<actions::ActionOutcome> {
        match result {
            Ok(outcome) => {
                self.set_info(outcome.message.clone());
                self.reload();
                Some(outcome)
            }
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    fn sync_draft(&mut self) {
        self.session = self
            .session
            .clone()
            .with_draft(self.chat_input.value().to_string());
    }
}

pub fn run(service: TaskService, session: Session) -> Result<()> {
    // The first load seeds a missing file and surfaces disk errors
    // before the terminal goes raw.
    service.board()?;

    let (ui_tx, ui_rx) = mpsc::channel();
    spawn_watch(service.store().path().to_path_buf(), ui_tx);

    let mut app = AppState::new(service, session)?;
    run_terminal(&mut app, ui_rx)
}

fn run_terminal(app: &mut AppState, ui_rx: Receiver<UiMsg>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, ui_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            match msg {
                UiMsg::Changed => app.reload(),
                UiMsg::WatchError(err) => app.watch_error = Some(err),
            }
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Handle one key event. Returns `true` when the app should exit.
fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    app.status_message = None;

    if app.overlay.is_some() {
        return handle_overlay_key(app, key);
    }

    match app.session.page() {
        Page::Board => handle_board_key(app, key),
        Page::Chat => handle_chat_key(app, key),
    }
}

fn handle_board_key(app: &mut AppState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => app.focus = prev_area(app.focus),
        KeyCode::Right | KeyCode::Char('l') => app.focus = next_area(app.focus),
        KeyCode::Up | KeyCode::Char('k') => {
            let idx = area_index(app.focus);
            app.selected[idx] = app.selected[idx].saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let idx = area_index(app.focus);
            let len = app.board.in_area(app.focus).len();
            if len > 0 && app.selected[idx] + 1 < len {
                app.selected[idx] += 1;
            }
        }
        KeyCode::Enter => {
            if let Some(task_id) = app.selected_task_id() {
                app.session = app.session.clone().open_chat(&task_id);
                app.chat_input = LineInput::new();
                app.chat_scroll = 0;
            }
        }
        KeyCode::Char('n') => {
            app.overlay = Some(Overlay::NewTask {
                input: LineInput::new(),
                area: app.focus,
            });
        }
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('L') => {
            app.session = app.session.clone().logout();
            app.overlay = Some(Overlay::Login(LineInput::new()));
        }
        _ => {}
    }
    false
}

fn handle_chat_key(app: &mut AppState, key: KeyEvent) -> bool {
    let Some(task_id) = app.session.selected_task().map(str::to_string) else {
        app.session = app.session.clone().close_chat();
        return false;
    };

    match key.code {
        KeyCode::Esc => {
            app.session = app.session.clone().close_chat();
            app.chat_input = LineInput::new();
        }
        KeyCode::Enter => {
            if app.chat_input.is_empty() {
                app.set_error("enter a message first".to_string());
                return false;
            }
            app.sync_draft();
            let (session, draft) = app.session.clone().take_draft();
            app.session = session;
            let result = actions::send_message(&app.service, &app.session, &task_id, &draft);
            if app.apply(result).is_some() {
                app.chat_input = LineInput::new();
                app.chat_scroll = 0;
            } else {
                // Leave the draft editable on failure.
                app.session = app.session.clone().with_draft(draft);
            }
        }
        KeyCode::Tab => {
            if let Some(task) = app.board.get(&task_id) {
                let target = next_area(task.area);
                let result = actions::move_task(&app.service, &task_id, target);
                app.apply(result);
            }
        }
        KeyCode::Up => app.chat_scroll += 1,
        KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        KeyCode::Char(ch) => {
            app.chat_input.insert(ch);
            app.sync_draft();
        }
        KeyCode::Backspace => {
            app.chat_input.backspace();
            app.sync_draft();
        }
        KeyCode::Delete => {
            app.chat_input.delete();
            app.sync_draft();
        }
        KeyCode::Left => app.chat_input.move_left(),
        KeyCode::Right => app.chat_input.move_right(),
        KeyCode::Home => app.chat_input.move_home(),
        KeyCode::End => app.chat_input.move_end(),
        _ => {}
    }
    false
}

fn handle_overlay_key(app: &mut AppState, key: KeyEvent) -> bool {
    // Take the overlay out so the handlers can borrow the rest of the
    // app freely; put it back unless this key dismissed it.
    let Some(mut overlay) = app.overlay.take() else {
        return false;
    };

    let mut keep_overlay = true;
    let mut quit = false;

    match &mut overlay {
        Overlay::Login(input) => match key.code {
            // There is no board without an identity; Esc leaves the app.
            KeyCode::Esc => quit = true,
            KeyCode::Enter => {
                if input.is_empty() {
                    app.set_error("enter a user name".to_string());
                } else {
                    let name = input.take();
                    app.session = app.session.clone().login(&name);
                    app.set_info(format!("logged in as {}", app.session.user()));
                    keep_overlay = false;
                }
            }
            KeyCode::Char(ch) => input.insert(ch),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        },
        Overlay::NewTask { input, area } => match key.code {
            KeyCode::Esc => keep_overlay = false,
            KeyCode::Tab => *area = next_area(*area),
            KeyCode::BackTab => *area = prev_area(*area),
            KeyCode::Enter => {
                if input.is_empty() {
                    app.set_error("enter a task name".to_string());
                } else {
                    let name = input.take();
                    let target = *area;
                    let result = actions::create_task(
                        &app.service,
                        &app.session,
                        NewTaskInput { name, area: target },
                    );
                    if app.apply(result).is_some() {
                        app.focus = target;
                    }
                    keep_overlay = false;
                }
            }
            KeyCode::Char(ch) => input.insert(ch),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        },
    }

    if keep_overlay && !quit {
        app.overlay = Some(overlay);
    }
    quit
}

fn spawn_watch(path: PathBuf, ui_tx: Sender<UiMsg>) {
    thread::spawn(move || {
        let (event_tx, event_rx) = mpsc::channel();
        let watcher: notify::Result<RecommendedWatcher> = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        });

        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(err) => {
                let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
                return;
            }
        };

        // Watch the directory: saves replace the file via rename, which
        // would detach a watch on the file itself.
        let dir = match path.parent() {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            let _ = ui_tx.send(UiMsg::WatchError(err.to_string()));
            return;
        }

        let file_name = path.file_name().map(|name| name.to_os_string());
        loop {
            let event = match event_rx.recv() {
                Ok(event) => event,
                Err(_) => break,
            };
            let relevant = match &event {
                Ok(event) => {
                    event.paths.is_empty()
                        || event.paths.iter().any(|p| {
                            p.file_name().map(|n| n.to_os_string()) == file_name
                        })
                }
                Err(_) => false,
            };
            if !relevant {
                continue;
            }

            // Debounce bursts (temp write + rename arrive together).
            thread::sleep(Duration::from_millis(WATCH_DEBOUNCE_MS));
            while event_rx.try_recv().is_ok() {}

            if ui_tx.send(UiMsg::Changed).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use tempfile::TempDir;

    fn app_in(temp: &TempDir) -> AppState {
        let service = TaskService::new(TaskStore::new(temp.path().join("tasks.json")));
        AppState::new(service, Session::new().login("mika")).unwrap()
    }

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn logged_in_session_skips_login_overlay() {
        let temp = TempDir::new().unwrap();
        let app = app_in(&temp);
        assert!(app.overlay.is_none());
    }

    #[test]
    fn guest_session_starts_at_login() {
        let temp = TempDir::new().unwrap();
        let service = TaskService::new(TaskStore::new(temp.path().join("tasks.json")));
        let app = AppState::new(service, Session::new()).unwrap();
        assert!(matches!(app.overlay, Some(Overlay::Login(_))));
    }

    #[test]
    fn focus_cycles_through_all_areas() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        assert_eq!(app.focus, Area::Idea);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.focus, Area::InProgress);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.focus, Area::Done);
    }

    #[test]
    fn enter_opens_chat_for_the_selected_task() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.page(), Page::Chat);
        assert_eq!(app.session.selected_task(), Some("1"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.page(), Page::Board);
    }

    #[test]
    fn typed_chat_text_lands_in_the_session_draft() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Enter);
        for ch in "hi".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        assert_eq!(app.session.draft(), "hi");
    }

    #[test]
    fn sending_a_message_persists_and_clears_the_draft() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Enter);
        for ch in "hello".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.session.draft().is_empty());
        let last = app.board.get("1").unwrap().chat.last().unwrap().clone();
        assert_eq!(last.sender, "mika");
        assert_eq!(last.message, "hello");
    }

    #[test]
    fn tab_in_chat_moves_the_task_forward() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.board.get("1").unwrap().area, Area::InProgress);
    }

    #[test]
    fn new_task_overlay_creates_in_focused_area() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Right); // focus in_progress
        press(&mut app, KeyCode::Char('n'));
        assert!(matches!(
            app.overlay,
            Some(Overlay::NewTask { area: Area::InProgress, .. })
        ));
        for ch in "Ship it".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.overlay.is_none());
        assert_eq!(app.board.in_area(Area::InProgress).len(), 2);
    }

    #[test]
    fn logout_returns_to_the_login_overlay() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        press(&mut app, KeyCode::Char('L'));
        assert!(!app.session.is_logged_in());
        assert!(matches!(app.overlay, Some(Overlay::Login(_))));
    }
}
