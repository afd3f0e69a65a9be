/// Session sidebar — collapsible left panel listing backend sessions.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::AppState;

pub fn draw_sidebar(f: &mut Frame, state: &AppState, area: Rect) {
    let focused = state.sidebar_focused;
    let border_color = if focused { Color::Cyan } else { Color::Rgb(40, 38, 60) };

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(Color::Rgb(6, 6, 12)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let w = inner.width as usize;
    let mut items: Vec<ListItem<'static>> = Vec::new();

    // Header
    let ctrl_hint = if focused { " Esc=exit" } else { " Tab=focus" };
    let header_pad = w.saturating_sub(9 + ctrl_hint.len());
    items.push(ListItem::new(Line::from(vec![
        Span::styled(
            " Sessions",
            Style::default().fg(Color::Rgb(100, 95, 150)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(header_pad), Style::default()),
        Span::styled(ctrl_hint.to_string(), Style::default().fg(Color::Rgb(50, 47, 75))),
    ])));
    items.push(ListItem::new(Line::from(vec![Span::styled(
        "─".repeat(w),
        Style::default().fg(Color::Rgb(35, 33, 55)),
    )])));

    if state.sessions.is_empty() {
        items.push(ListItem::new(Line::from(vec![Span::styled(
            " no sessions",
            Style::default().fg(Color::Rgb(50, 47, 75)),
        )])));
    } else {
        for (i, session) in state.sessions.iter().enumerate() {
            let current = state.active_session.as_deref() == Some(session.id.as_str());
            let selected = focused && i == state.sidebar_selected;

            // Current session = cyan; selected (focused) = bright highlight
            let (bg, bullet_fg, name_fg) = if current && selected {
                (Color::Rgb(20, 40, 50), Color::Cyan, Color::Cyan)
            } else if current {
                (Color::Rgb(10, 22, 30), Color::Cyan, Color::Cyan)
            } else if selected {
                (Color::Rgb(28, 26, 48), Color::Rgb(160, 155, 220), Color::White)
            } else {
                (Color::Reset, Color::Rgb(60, 57, 90), Color::Rgb(150, 145, 190))
            };

            let bullet = if current { "●" } else { "○" };

            let label = state.session_label(session);
            let label: String = label.chars().take(w.saturating_sub(3)).collect();
            let gap = w.saturating_sub(3 + label.chars().count());
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!(" {bullet} "), Style::default().fg(bullet_fg).bg(bg)),
                Span::styled(
                    label,
                    Style::default().fg(name_fg).bg(bg).add_modifier(if current {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
                Span::styled(" ".repeat(gap), Style::default().bg(bg)),
            ])));
        }
    }

    // Footer hint
    items.push(ListItem::new(Line::from(vec![Span::styled(
        " [Ctrl+N] New",
        Style::default().fg(Color::Rgb(55, 52, 80)),
    )])));

    f.render_widget(List::new(items), inner);
}
