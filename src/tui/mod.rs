/// Ratatui console for agentdeck.
///
/// Architecture:
///   main task:    event loop — tokio::select! over the event channel, a
///                 UiEvent mpsc fed by spawned REST tasks, crossterm keys,
///                 and a 120ms animation/badge ticker
///   REST tasks:   tokio::spawn per call — results come back as UiEvents
///   channel task: ws::Connection — decoded ServerEvents on its own mpsc
///
/// All state lives in AppState and is only touched on the main task, so
/// transcript mutations apply strictly in arrival order.
///
/// Layout:
///   ┌──────────┬─────────────────────────────────────┐
///   │ sessions │  transcript / file tree (Min(0))    │
///   │ sidebar  ├─────────────────────────────────────┤
///   │          │  status bar (1 line)                │
///   │          ├─────────────────────────────────────┤
///   │          │  input box (3 lines, fixed)         │
///   └──────────┴─────────────────────────────────────┘
pub mod render;
pub mod chat;
pub mod sidebar;
pub mod files_view;
pub mod viewer;

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::api::{ApiClient, FileEntry, HistoryItem, Session};
use crate::config::ResolvedConfig;
use crate::files::{Badge, FileBrowser, FileKind};
use crate::protocol::ServerEvent;
use crate::transcript::ChatState;
use crate::ws::Connection;
use viewer::ViewerState;

// ── UiEvent — typed results from REST tasks → TUI ─────────────────────────────

#[derive(Debug, Clone)]
pub enum UiEvent {
    SessionsLoaded(Vec<Session>),
    SessionsFailed(String),
    SessionCreated(Session),
    SessionCreateFailed(String),
    /// History response, tagged so stale fetches can be discarded
    HistoryLoaded { session_id: String, epoch: u64, items: Vec<HistoryItem> },
    HistoryFailed { session_id: String, epoch: u64, error: String },
    /// The /agent/run POST failed; the run never started
    SubmitFailed(String),
    FilesLoaded(Vec<FileEntry>),
    FilesFailed(String),
    FileContentLoaded { path: String, content: String },
    FileContentFailed { path: String, error: String },
    FileSaved { path: String },
    FileSaveFailed { path: String, error: String },
}

// ── Tab ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Files,
}

// ── AppState ──────────────────────────────────────────────────────────────────

pub struct AppState {
    pub chat: ChatState,
    pub sessions: Vec<Session>,
    pub active_session: Option<String>,
    /// Bumped on every session switch; history responses carrying an older
    /// value are discarded
    pub history_epoch: u64,
    pub input: String,
    pub cursor: usize, // byte offset in input
    pub scroll: usize, // lines scrolled up in the transcript
    pub active_tab: Tab,
    pub files: FileBrowser,
    /// Listing needs a refetch (set after backend file operations)
    pub files_stale: bool,
    pub files_error: Option<String>,
    pub viewer: Option<ViewerState>,
    pub sidebar_visible: bool,
    pub sidebar_focused: bool,
    pub sidebar_selected: usize,
    /// Incremented every 120ms while a run or operation is live
    pub spinner_tick: u32,
    pub profile: String,
    pub server: String,
    pub client_id: String,
}

impl AppState {
    pub fn new(resolved: &ResolvedConfig, client_id: String) -> Self {
        Self {
            chat: ChatState::default(),
            sessions: Vec::new(),
            active_session: None,
            history_epoch: 0,
            input: String::new(),
            cursor: 0,
            scroll: 0,
            active_tab: Tab::Chat,
            files: FileBrowser::default(),
            files_stale: true,
            files_error: None,
            viewer: None,
            sidebar_visible: false, // set after terminal size check in event_loop
            sidebar_focused: false,
            sidebar_selected: 0,
            spinner_tick: 0,
            profile: resolved.profile_name.clone(),
            server: resolved.server.clone(),
            client_id,
        }
    }

    /// Submission gate: non-empty prompt, no run in flight, a session active.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && !self.chat.running && self.active_session.is_some()
    }

    /// Switch the active session: discard the transcript, release the run
    /// flag, and invalidate any in-flight history fetch. Returns the epoch
    /// the caller must tag the new fetch with.
    pub fn select_session(&mut self, id: String) -> u64 {
        self.active_session = Some(id);
        self.chat = ChatState::default();
        self.scroll = 0;
        self.files_stale = true;
        self.history_epoch += 1;
        self.history_epoch
    }

    /// Fold a history response in, unless it is stale (older epoch or a
    /// session that is no longer active).
    pub fn apply_history(&mut self, session_id: &str, epoch: u64, items: &[HistoryItem]) {
        if epoch != self.history_epoch || self.active_session.as_deref() != Some(session_id) {
            tracing::debug!(session_id, epoch, "discarding stale history response");
            return;
        }
        self.chat.reset_from_history(items);
        self.scroll = 0;
    }

    /// Fold one channel event into the transcript, plus the file-tree side
    /// effects the reducer doesn't know about.
    pub fn apply_server(&mut self, event: ServerEvent) {
        match &event {
            ServerEvent::FileOperation(op) => {
                if let Some(path) = &op.path {
                    self.files.set_badge(path, Badge::from_result(&op.result));
                }
                self.files_stale = true;
            }
            ServerEvent::Finish(_) | ServerEvent::Error(_) => {
                self.files_stale = true;
            }
            _ => {}
        }
        let before = self.chat.records.len();
        self.chat.apply(event);
        if self.chat.records.len() > before {
            self.scroll = 0; // auto-scroll to bottom on new content
        }
    }

    pub fn session_label(&self, session: &Session) -> String {
        if !session.name.trim().is_empty() {
            session.name.clone()
        } else {
            let id: String = session.id.chars().take(12).collect();
            format!("session {id}")
        }
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

// ── Main TUI run loop ─────────────────────────────────────────────────────────

pub async fn run(resolved: ResolvedConfig, client_id: String) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Panic hook — restore terminal before printing panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        orig_hook(info);
    }));

    let result = event_loop(&mut terminal, resolved, client_id).await;

    restore_terminal(&mut terminal);
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    resolved: ResolvedConfig,
    client_id: String,
) -> Result<()> {
    let api = ApiClient::new(&resolved.server);
    let mut state = AppState::new(&resolved, client_id.clone());

    // Auto-show sidebar when terminal is wide enough
    if let Ok((w, _)) = crossterm::terminal::size() {
        state.sidebar_visible = w >= 100;
    }

    // Channel: event stream → TUI
    let (ws_tx, mut ws_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let _connection = Connection::open(&resolved.ws_url, &client_id, ws_tx);

    // Channel: REST tasks → TUI
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();

    // Startup: load the session list; create one if the backend has none
    {
        let api = api.clone();
        let tx = ui_tx.clone();
        tokio::spawn(async move {
            match api.list_sessions().await {
                Ok(sessions) if sessions.is_empty() => match api.create_session().await {
                    Ok(session) => {
                        let _ = tx.send(UiEvent::SessionCreated(session));
                    }
                    Err(err) => {
                        let _ = tx.send(UiEvent::SessionCreateFailed(err.to_string()));
                    }
                },
                Ok(sessions) => {
                    let _ = tx.send(UiEvent::SessionsLoaded(sessions));
                }
                Err(err) => {
                    let _ = tx.send(UiEvent::SessionsFailed(err.to_string()));
                }
            }
        });
    }

    let mut crossterm_events = EventStream::new();
    let mut ticker = tokio::time::interval(tokio::time::Duration::from_millis(120));

    terminal.draw(|f| render::draw(f, &state))?;

    loop {
        tokio::select! {
            // ── Animation / badge tick ────────────────────────────────────────
            _ = ticker.tick() => {
                state.files.sweep_badges(Instant::now());
                let animating = state.chat.running || !state.chat.active_ops.is_empty();
                if animating {
                    state.spinner_tick = state.spinner_tick.wrapping_add(1);
                }
                if animating || state.active_tab == Tab::Files {
                    terminal.draw(|f| render::draw(f, &state))?;
                }
            }

            // ── Channel events ────────────────────────────────────────────────
            Some(ev) = ws_rx.recv() => {
                state.apply_server(ev);
                if state.files_stale && state.active_tab == Tab::Files {
                    refresh_files(&mut state, &api, &ui_tx);
                }
                terminal.draw(|f| render::draw(f, &state))?;
            }

            // ── REST task results ─────────────────────────────────────────────
            Some(ev) = ui_rx.recv() => {
                handle_ui_event(&mut state, ev, &api, &ui_tx);
                terminal.draw(|f| render::draw(f, &state))?;
            }

            // ── Keyboard/resize events ────────────────────────────────────────
            Some(Ok(ev)) = crossterm_events.next() => {
                match ev {
                    Event::Key(key) => {
                        if !handle_key(key, &mut state, &api, &ui_tx) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
                terminal.draw(|f| render::draw(f, &state))?;
            }
        }
    }

    Ok(())
}

// ── UiEvent handler ───────────────────────────────────────────────────────────

fn handle_ui_event(
    state: &mut AppState,
    ev: UiEvent,
    api: &ApiClient,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    match ev {
        UiEvent::SessionsLoaded(sessions) => {
            state.sessions = sessions;
            if state.active_session.is_none() {
                if let Some(first) = state.sessions.first().cloned() {
                    activate_session(state, first.id, api, ui_tx);
                }
            }
        }
        UiEvent::SessionsFailed(error) => {
            tracing::warn!(%error, "session list failed");
            state.chat.push_error(format!("Failed to load sessions: {error}"));
        }
        UiEvent::SessionCreated(session) => {
            let id = session.id.clone();
            state.sessions.insert(0, session);
            state.sidebar_selected = 0;
            activate_session(state, id, api, ui_tx);
        }
        UiEvent::SessionCreateFailed(error) => {
            tracing::warn!(%error, "session create failed");
            state.chat.push_error(format!("Failed to create session: {error}"));
        }
        UiEvent::HistoryLoaded { session_id, epoch, items } => {
            state.apply_history(&session_id, epoch, &items);
        }
        UiEvent::HistoryFailed { session_id, epoch, error } => {
            tracing::warn!(%session_id, %error, "history fetch failed");
            if epoch == state.history_epoch
                && state.active_session.as_deref() == Some(session_id.as_str())
            {
                state.chat.push_history_error();
            }
        }
        UiEvent::SubmitFailed(error) => {
            tracing::warn!(%error, "agent run failed to start");
            state.chat.push_error(format!("Failed to start agent: {error}"));
        }
        UiEvent::FilesLoaded(entries) => {
            state.files_error = None;
            state.files.set_entries(&entries);
        }
        UiEvent::FilesFailed(error) => {
            tracing::warn!(%error, "file listing failed");
            state.files_error = Some(error);
        }
        UiEvent::FileContentLoaded { path, content } => {
            state.viewer = Some(ViewerState::new(path, content));
        }
        UiEvent::FileContentFailed { path, error } => {
            tracing::warn!(%path, %error, "file read failed");
            state.files_error = Some(format!("{path}: {error}"));
        }
        UiEvent::FileSaved { path } => {
            state.files.set_badge(&path, Badge::Saved);
            if let Some(viewer) = &mut state.viewer {
                if viewer.path == path {
                    viewer.mark_saved();
                }
            }
        }
        UiEvent::FileSaveFailed { path, error } => {
            tracing::warn!(%path, %error, "file save failed");
            if let Some(viewer) = &mut state.viewer {
                if viewer.path == path {
                    viewer.mark_save_failed(&error);
                }
            }
        }
    }
}

// ── Spawned REST actions ──────────────────────────────────────────────────────

fn activate_session(
    state: &mut AppState,
    id: String,
    api: &ApiClient,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    let epoch = state.select_session(id.clone());
    let api = api.clone();
    let tx = ui_tx.clone();
    tokio::spawn(async move {
        let ev = match api.history(&id).await {
            Ok(items) => UiEvent::HistoryLoaded { session_id: id, epoch, items },
            Err(err) => UiEvent::HistoryFailed { session_id: id, epoch, error: err.to_string() },
        };
        let _ = tx.send(ev);
    });
}

fn refresh_files(state: &mut AppState, api: &ApiClient, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    let Some(session_id) = state.active_session.clone() else { return };
    state.files_stale = false;
    let api = api.clone();
    let tx = ui_tx.clone();
    tokio::spawn(async move {
        let ev = match api.list_files(&session_id, ".").await {
            Ok(entries) => UiEvent::FilesLoaded(entries),
            Err(err) => UiEvent::FilesFailed(err.to_string()),
        };
        let _ = tx.send(ev);
    });
}

fn submit_prompt(state: &mut AppState, api: &ApiClient, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    if !state.can_submit() {
        return;
    }
    let prompt = state.input.trim().to_string();
    state.input.clear();
    state.cursor = 0;
    state.chat.push_user(prompt.clone());
    state.scroll = 0;

    let session_id = state.active_session.clone().unwrap_or_default();
    let client_id = state.client_id.clone();
    let api = api.clone();
    let tx = ui_tx.clone();
    tokio::spawn(async move {
        if let Err(err) = api.run_agent(&prompt, &session_id, &client_id).await {
            let _ = tx.send(UiEvent::SubmitFailed(err.to_string()));
        }
    });
}

fn open_selected_file(state: &mut AppState, api: &ApiClient, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    let Some(row) = state.files.selected_row() else { return };
    match row.kind {
        FileKind::Directory => state.files.toggle_expand(&row.path),
        FileKind::File => {
            let Some(session_id) = state.active_session.clone() else { return };
            let api = api.clone();
            let tx = ui_tx.clone();
            tokio::spawn(async move {
                let ev = match api.file_content(&session_id, &row.path).await {
                    Ok(content) => UiEvent::FileContentLoaded { path: row.path, content },
                    Err(err) => {
                        UiEvent::FileContentFailed { path: row.path, error: err.to_string() }
                    }
                };
                let _ = tx.send(ev);
            });
        }
    }
}

fn save_viewer(state: &mut AppState, api: &ApiClient, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    let Some(viewer) = &mut state.viewer else { return };
    let Some(session_id) = state.active_session.clone() else { return };
    let path = viewer.path.clone();
    let content = viewer.content();
    viewer.mark_saving();
    let api = api.clone();
    let tx = ui_tx.clone();
    tokio::spawn(async move {
        let ev = match api.save_file(&session_id, &path, &content).await {
            Ok(()) => UiEvent::FileSaved { path },
            Err(err) => UiEvent::FileSaveFailed { path, error: err.to_string() },
        };
        let _ = tx.send(ev);
    });
}

// ── Key handler ───────────────────────────────────────────────────────────────

/// Returns false when the app should exit.
fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    api: &ApiClient,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) -> bool {
    // ── File viewer overlay intercepts everything ─────────────────────────────
    if state.viewer.is_some() {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    save_viewer(state, api, ui_tx);
                    return true;
                }
                KeyCode::Char('c') | KeyCode::Char('q') => return false,
                _ => return true,
            }
        }
        let Some(viewer) = state.viewer.as_mut() else { return true };
        match key.code {
            KeyCode::Esc => state.viewer = None,
            KeyCode::Up => viewer.move_up(),
            KeyCode::Down => viewer.move_down(),
            KeyCode::Left => viewer.move_left(),
            KeyCode::Right => viewer.move_right(),
            KeyCode::PageUp => viewer.page_up(20),
            KeyCode::PageDown => viewer.page_down(20),
            KeyCode::Home => viewer.move_home(),
            KeyCode::End => viewer.move_end(),
            KeyCode::Enter => viewer.insert_newline(),
            KeyCode::Backspace => viewer.backspace(),
            KeyCode::Char(c) => viewer.insert_char(c),
            _ => {}
        }
        return true;
    }

    // ── Global chords ─────────────────────────────────────────────────────────
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return false,
            KeyCode::Char('b') => {
                state.sidebar_visible = !state.sidebar_visible;
                if !state.sidebar_visible {
                    state.sidebar_focused = false;
                }
                return true;
            }
            KeyCode::Char('f') => {
                state.active_tab = match state.active_tab {
                    Tab::Chat => Tab::Files,
                    Tab::Files => Tab::Chat,
                };
                if state.active_tab == Tab::Files {
                    refresh_files(state, api, ui_tx);
                }
                return true;
            }
            KeyCode::Char('n') => {
                let api = api.clone();
                let tx = ui_tx.clone();
                tokio::spawn(async move {
                    let ev = match api.create_session().await {
                        Ok(session) => UiEvent::SessionCreated(session),
                        Err(err) => UiEvent::SessionCreateFailed(err.to_string()),
                    };
                    let _ = tx.send(ev);
                });
                return true;
            }
            KeyCode::Char('r') => {
                refresh_files(state, api, ui_tx);
                return true;
            }
            _ => return true,
        }
    }

    // ── Sidebar focused navigation ────────────────────────────────────────────
    if state.sidebar_focused && state.sidebar_visible {
        match key.code {
            KeyCode::Up => {
                if state.sidebar_selected > 0 {
                    state.sidebar_selected -= 1;
                }
                return true;
            }
            KeyCode::Down => {
                if state.sidebar_selected + 1 < state.sessions.len() {
                    state.sidebar_selected += 1;
                }
                return true;
            }
            KeyCode::Enter => {
                if let Some(session) = state.sessions.get(state.sidebar_selected).cloned() {
                    state.sidebar_focused = false;
                    if state.active_session.as_deref() != Some(session.id.as_str()) {
                        activate_session(state, session.id, api, ui_tx);
                    }
                }
                return true;
            }
            KeyCode::Esc => {
                state.sidebar_focused = false;
                return true;
            }
            // Typing while the sidebar is focused drops focus back to the input
            KeyCode::Char(_) => {
                state.sidebar_focused = false;
            }
            _ => return true,
        }
    }

    match key.code {
        KeyCode::Tab if state.sidebar_visible => {
            state.sidebar_focused = true;
        }
        KeyCode::Enter => match state.active_tab {
            Tab::Chat => submit_prompt(state, api, ui_tx),
            Tab::Files => open_selected_file(state, api, ui_tx),
        },
        KeyCode::Up => match state.active_tab {
            Tab::Chat => state.scroll = state.scroll.saturating_add(1),
            Tab::Files => state.files.move_selection(-1),
        },
        KeyCode::Down => match state.active_tab {
            Tab::Chat => state.scroll = state.scroll.saturating_sub(1),
            Tab::Files => state.files.move_selection(1),
        },
        KeyCode::PageUp => state.scroll = state.scroll.saturating_add(10),
        KeyCode::PageDown => state.scroll = state.scroll.saturating_sub(10),
        KeyCode::Left => {
            if let Some(prev) = prev_char_boundary(&state.input, state.cursor) {
                state.cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(c) = state.input[state.cursor..].chars().next() {
                state.cursor += c.len_utf8();
            }
        }
        KeyCode::Home => state.cursor = 0,
        KeyCode::End => state.cursor = state.input.len(),
        KeyCode::Backspace => {
            if let Some(prev) = prev_char_boundary(&state.input, state.cursor) {
                state.input.drain(prev..state.cursor);
                state.cursor = prev;
            }
        }
        KeyCode::Char(c) => {
            state.input.insert(state.cursor, c);
            state.cursor += c.len_utf8();
        }
        _ => {}
    }
    true
}

fn prev_char_boundary(s: &str, cursor: usize) -> Option<usize> {
    s[..cursor].chars().next_back().map(|c| cursor - c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptRecord;

    fn resolved() -> ResolvedConfig {
        ResolvedConfig {
            server: "http://localhost:8000".to_string(),
            ws_url: "ws://localhost:8000/ws".to_string(),
            profile_name: "test".to_string(),
        }
    }

    fn state() -> AppState {
        AppState::new(&resolved(), "client_1_1".to_string())
    }

    #[test]
    fn submission_requires_prompt_session_and_idle_run() {
        let mut s = state();
        s.input = "hello".to_string();
        assert!(!s.can_submit()); // no active session

        s.active_session = Some("abc".to_string());
        assert!(s.can_submit());

        s.input = "   ".to_string();
        assert!(!s.can_submit()); // whitespace only

        s.input = "hello".to_string();
        s.chat.running = true;
        assert!(!s.can_submit()); // run in flight
    }

    #[test]
    fn session_switch_discards_transcript_and_bumps_epoch() {
        let mut s = state();
        s.active_session = Some("a".to_string());
        s.chat.push_user("old".to_string());
        assert!(s.chat.running);

        let epoch = s.select_session("b".to_string());
        assert_eq!(epoch, 1);
        assert!(s.chat.records.is_empty());
        assert!(!s.chat.running);
        assert_eq!(s.active_session.as_deref(), Some("b"));
    }

    #[test]
    fn stale_history_responses_are_discarded() {
        let mut s = state();
        let old_epoch = s.select_session("a".to_string());
        let new_epoch = s.select_session("b".to_string());

        let items = vec![HistoryItem { kind: "user".to_string(), text: "hi".to_string() }];

        // Response for the old fetch arrives late
        s.apply_history("a", old_epoch, &items);
        assert!(s.chat.records.is_empty());

        // Same-epoch response for a different session is also stale
        s.apply_history("a", new_epoch, &items);
        assert!(s.chat.records.is_empty());

        s.apply_history("b", new_epoch, &items);
        assert_eq!(s.chat.records.len(), 1);
    }

    #[test]
    fn file_operation_sets_badge_and_marks_listing_stale() {
        let mut s = state();
        s.files_stale = false;
        s.apply_server(ServerEvent::FileOperation(crate::protocol::FileOperation {
            success: true,
            result: "Created file main.py".to_string(),
            path: Some("main.py".to_string()),
            duration: None,
        }));
        assert!(s.files_stale);
        assert_eq!(s.files.badge("main.py"), Some(Badge::Created));
        assert!(matches!(s.chat.records[0], TranscriptRecord::Operation(_)));
    }

    #[test]
    fn cursor_editing_respects_char_boundaries() {
        let mut s = state();
        s.input = "héllo".to_string();
        s.cursor = s.input.len();

        let prev = prev_char_boundary(&s.input, s.cursor).unwrap();
        assert_eq!(&s.input[prev..], "o");

        s.cursor = 3; // after 'é' (2 bytes)
        let prev = prev_char_boundary(&s.input, s.cursor).unwrap();
        assert_eq!(prev, 1);
    }
}
