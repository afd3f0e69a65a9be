/// Ratatui draw entry-point for agentdeck.
/// Thin dispatcher — transcript rendering lives in chat.rs, the tree in
/// files_view.rs, the editor overlay in viewer.rs.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{AppState, Tab};
use super::chat::SPINNER_GLYPHS;
use crate::protocol::ConnectionStatus;

// ── Main draw entry point ─────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();

    // Horizontal split when sidebar is visible
    let main_area = if state.sidebar_visible {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);
        super::sidebar::draw_sidebar(f, state, cols[0]);
        cols[1]
    } else {
        area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(0),    // content area
            Constraint::Length(1), // status bar
            Constraint::Length(3), // input box
        ])
        .split(main_area);

    draw_tab_bar(f, state, chunks[0]);

    match state.active_tab {
        Tab::Chat => super::chat::draw_history(f, state, chunks[1]),
        Tab::Files => super::files_view::draw(f, state, chunks[1]),
    }

    // Floating in-flight operations panel sits over the transcript
    if state.active_tab == Tab::Chat && !state.chat.active_ops.is_empty() {
        super::chat::draw_active_ops(f, state, chunks[1]);
    }

    draw_status_bar(f, state, chunks[2]);
    draw_input(f, state, chunks[3]);

    if let Some(viewer) = &state.viewer {
        super::viewer::draw(f, viewer, area);
    }
}

// ── Tab bar ───────────────────────────────────────────────────────────────────

fn draw_tab_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let tabs: &[(&str, Tab)] = &[("[Chat] ", Tab::Chat), ("[Files]", Tab::Files)];

    let mut spans = vec![Span::raw(" ")];
    for (label, tab) in tabs {
        let active = state.active_tab == *tab;
        let style = if active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Rgb(60, 55, 90))
        };
        spans.push(Span::styled(label.to_string(), style));
        spans.push(Span::styled("  ", Style::default()));
    }
    spans.push(Span::styled(
        "Ctrl+F switch",
        Style::default().fg(Color::Rgb(45, 42, 70)),
    ));

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(6, 6, 12))),
        area,
    );
}

// ── Status bar ────────────────────────────────────────────────────────────────

fn draw_status_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let (conn_glyph, conn_color) = match state.chat.connection {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Error => ("●", Color::Red),
        ConnectionStatus::Disconnected => ("○", Color::DarkGray),
    };

    let session_label = state
        .active_session
        .as_ref()
        .and_then(|id| state.sessions.iter().find(|s| &s.id == id))
        .map(|s| state.session_label(s))
        .unwrap_or_else(|| "no session".to_string());

    // Animated spinner glyph while a run is in flight
    let (status_glyph, status_color) = if state.chat.running {
        let g = SPINNER_GLYPHS[(state.spinner_tick as usize) % SPINNER_GLYPHS.len()];
        (g, Color::Cyan)
    } else {
        ("▲", Color::White)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(status_glyph, Style::default().fg(status_color).add_modifier(Modifier::BOLD)),
        Span::styled(" agentdeck", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(conn_glyph, Style::default().fg(conn_color)),
        Span::styled("  ", Style::default()),
        Span::styled(
            state.profile.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(state.server.clone(), Style::default().fg(Color::Rgb(100, 180, 220))),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(session_label, Style::default().fg(Color::DarkGray)),
        Span::styled(
            "  Ctrl+B sidebar  Ctrl+N new session",
            Style::default().fg(Color::Rgb(55, 50, 90)),
        ),
    ]);

    let bar_style = if state.chat.running {
        Style::default().bg(Color::Rgb(15, 15, 25))
    } else {
        Style::default().bg(Color::Rgb(10, 10, 18))
    };

    f.render_widget(Paragraph::new(line).style(bar_style), area);
}

// ── Input box ─────────────────────────────────────────────────────────────────

fn draw_input(f: &mut Frame, state: &AppState, area: Rect) {
    let running = state.chat.running;
    let (border_color, prompt_color, prompt_char) = if running {
        (Color::Rgb(40, 40, 60), Color::DarkGray, "·")
    } else if state.sidebar_focused {
        (Color::Rgb(40, 40, 60), Color::DarkGray, "❯")
    } else {
        (Color::Rgb(60, 60, 80), Color::Cyan, "❯")
    };

    let prompt_span = Span::styled(
        format!("  {prompt_char} "),
        Style::default().fg(prompt_color).add_modifier(Modifier::BOLD),
    );

    let content_span = if running {
        let tick = state.spinner_tick as usize;
        let g = SPINNER_GLYPHS[tick % SPINNER_GLYPHS.len()];
        Span::styled(
            format!("{g} agent working…"),
            Style::default().fg(Color::Rgb(60, 60, 80)),
        )
    } else if state.input.is_empty() {
        let hint = if state.active_session.is_none() {
            "waiting for a session…"
        } else {
            "message · Enter send · Ctrl+B sidebar · Ctrl+F files"
        };
        Span::styled(hint, Style::default().fg(Color::Rgb(70, 70, 90)))
    } else {
        Span::styled(state.input.clone(), Style::default().fg(Color::White))
    };

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Color::Rgb(8, 8, 14)));

    f.render_widget(
        Paragraph::new(Line::from(vec![prompt_span, content_span]))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );

    // Position cursor at the actual edit cursor, not end of string
    if !running && !state.sidebar_focused && state.viewer.is_none() {
        use unicode_width::UnicodeWidthStr;
        // prompt is "  ❯ " — ❯ is 1 wide, total visible width is 4 cols
        let prompt_width: u16 = 4;
        let text_before_cursor = &state.input[..state.cursor.min(state.input.len())];
        let cursor_x = area.x + prompt_width + text_before_cursor.width() as u16;
        let cursor_y = area.y + 1; // +1 for top border
        if cursor_x < area.x + area.width {
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}
