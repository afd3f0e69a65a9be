/// Workspace file-tree pane — renders the flattened expanded tree with
/// transient status badges.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem},
};

use super::AppState;
use crate::files::{Badge, FileKind};

fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Created => Color::Rgb(0, 200, 100),
        Badge::Modified => Color::Rgb(220, 160, 30),
        Badge::Deleted => Color::Red,
        Badge::Saved => Color::Cyan,
    }
}

pub fn draw(f: &mut Frame, state: &AppState, area: Rect) {
    let mut items: Vec<ListItem<'static>> = Vec::new();

    if let Some(error) = &state.files_error {
        items.push(ListItem::new(Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(Color::Red)),
            Span::styled(error.clone(), Style::default().fg(Color::Rgb(230, 120, 120))),
        ])));
        items.push(ListItem::new(Line::raw("")));
    }

    let rows = state.files.visible_rows();
    if rows.is_empty() {
        let hint = if state.active_session.is_none() {
            "  waiting for a session…"
        } else if state.files.is_empty() {
            "  workspace is empty · Ctrl+R refresh"
        } else {
            "  tree collapsed"
        };
        items.push(ListItem::new(Line::from(vec![Span::styled(
            hint,
            Style::default().fg(Color::Rgb(70, 70, 90)),
        )])));
    }

    for (i, row) in rows.iter().enumerate() {
        let selected = i == state.files.selected;
        let indent = "  ".repeat(row.depth + 1);

        let (glyph, glyph_fg, name_fg) = match row.kind {
            FileKind::Directory => {
                let arrow = if row.expanded { "▾ " } else { "▸ " };
                (arrow, Color::Rgb(100, 180, 220), Color::Rgb(150, 190, 220))
            }
            FileKind::File => ("  ", Color::Reset, Color::Rgb(180, 180, 200)),
        };

        let bg = if selected { Color::Rgb(28, 26, 48) } else { Color::Reset };
        let name_style = if selected {
            Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(name_fg).bg(bg)
        };

        let mut spans = vec![
            Span::styled(indent, Style::default().bg(bg)),
            Span::styled(glyph, Style::default().fg(glyph_fg).bg(bg)),
            Span::styled(row.name.clone(), name_style),
        ];

        if let Some(badge) = state.files.badge(&row.path) {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
            spans.push(Span::styled(
                badge.label(),
                Style::default().fg(badge_color(badge)).bg(bg).add_modifier(Modifier::ITALIC),
            ));
        }

        items.push(ListItem::new(Line::from(spans)));
    }

    let list =
        List::new(items).block(Block::default().style(Style::default().bg(Color::Rgb(8, 8, 14))));
    f.render_widget(list, area);
}
