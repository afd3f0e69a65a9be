/// Transcript pane rendering — build_items, draw_history, the floating
/// in-flight operations panel, spinner, utilities.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::AppState;
use crate::protocol::ToolKind;
use crate::transcript::{OpStatus, OperationRecord, Task, TranscriptRecord};

// ── Spinner ────────────────────────────────────────────────────────────────────

pub const SPINNER_GLYPHS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ── Operation glyphs ───────────────────────────────────────────────────────────

fn op_glyph(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::File => "▤",
        ToolKind::Terminal => "❯",
        ToolKind::Browser => "◍",
    }
}

fn op_color(kind: ToolKind) -> Color {
    match kind {
        ToolKind::File => Color::Green,
        ToolKind::Terminal => Color::Yellow,
        ToolKind::Browser => Color::Magenta,
    }
}

// ── Transcript items builder ───────────────────────────────────────────────────

pub fn build_items(state: &AppState, term_width: u16) -> Vec<ListItem<'static>> {
    let mut items: Vec<ListItem<'static>> = Vec::new();

    for record in &state.chat.records {
        match record {
            TranscriptRecord::User(msg) => {
                push_user_bubble(&mut items, msg, term_width);
            }

            TranscriptRecord::Agent(text) => {
                // "        " indent = 8 cols
                let wrap_width = (term_width as usize).saturating_sub(8).max(20);
                let label_fg = Color::Rgb(0, 210, 210);
                let text_fg = Color::Rgb(210, 230, 255);

                let mut first = true;
                for src_line in text.lines() {
                    for w in wrap_text(src_line, wrap_width) {
                        if first {
                            first = false;
                            items.push(ListItem::new(Line::from(vec![
                                Span::raw("  "),
                                Span::styled(
                                    "agent",
                                    Style::default().fg(label_fg).add_modifier(Modifier::BOLD),
                                ),
                                Span::styled("  ", Style::default()),
                                Span::styled(w, Style::default().fg(text_fg)),
                            ])));
                        } else {
                            items.push(ListItem::new(Line::from(vec![
                                Span::raw("         "),
                                Span::styled(w, Style::default().fg(text_fg)),
                            ])));
                        }
                    }
                }
                items.push(ListItem::new(Line::raw("")));
            }

            TranscriptRecord::AgentStatus(text) => {
                items.push(ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled("◌ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        text.clone(),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                    ),
                ])));
            }

            TranscriptRecord::AgentError(text) => {
                let wrap_width = (term_width as usize).saturating_sub(6).max(20);
                let mut first = true;
                for src_line in text.lines() {
                    for w in wrap_text(src_line, wrap_width) {
                        let prefix = if first { "  ✗ " } else { "    " };
                        first = false;
                        items.push(ListItem::new(Line::from(vec![
                            Span::styled(prefix, Style::default().fg(Color::Red)),
                            Span::styled(w, Style::default().fg(Color::Rgb(230, 120, 120))),
                        ])));
                    }
                }
                items.push(ListItem::new(Line::raw("")));
            }

            TranscriptRecord::AgentPlan { tasks } => {
                items.extend(build_plan_items(tasks));
            }

            TranscriptRecord::OperationLoading { description, .. } => {
                let glyph = SPINNER_GLYPHS[(state.spinner_tick as usize) % SPINNER_GLYPHS.len()];
                items.push(ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{glyph} "),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description.clone(), Style::default().fg(Color::Rgb(150, 170, 200))),
                ])));
            }

            TranscriptRecord::Operation(op) => {
                items.extend(build_operation_items(op, term_width));
            }
        }
    }

    items
}

fn push_user_bubble(items: &mut Vec<ListItem<'static>>, msg: &str, term_width: u16) {
    let bg = Color::Rgb(28, 26, 52);
    let border = Color::Rgb(110, 90, 200);
    let label_fg = Color::Rgb(160, 140, 255);
    let text_fg = Color::Rgb(235, 232, 255);
    let body_style = Style::default().fg(text_fg).bg(bg);
    let edge_style = Style::default().fg(border).bg(bg);

    // Dynamic widths — 2 chars left margin, 1 right margin
    let inner_w = (term_width as usize).saturating_sub(3).max(10);
    // Top: "╭─ you ──...──╮" — corners+spacing = 4, label = 3
    let dash_total = inner_w.saturating_sub(4 + 3);
    let top_dashes = "─".repeat(dash_total);
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled("╭─ ".to_string(), edge_style),
        Span::styled("you", Style::default().fg(label_fg).bg(bg).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {top_dashes}╮"), edge_style),
    ])));

    // Body — word-wrap inside the box (inner_w minus "│ " = 2)
    let wrap_width = inner_w.saturating_sub(2).max(10);
    let raw_lines: Vec<&str> = if msg.is_empty() { vec![""] } else { msg.lines().collect() };
    for line in raw_lines.iter().flat_map(|line| wrap_text(line, wrap_width)) {
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled("│ ", edge_style),
            Span::styled(line, body_style),
        ])));
    }

    let bot_dashes = "─".repeat(inner_w.saturating_sub(2));
    items.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("╰{bot_dashes}╯"), edge_style),
    ])));
    items.push(ListItem::new(Line::raw("")));
}

// ── Plan card ─────────────────────────────────────────────────────────────────

fn build_plan_items(tasks: &[Task]) -> Vec<ListItem<'static>> {
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.completed).count();

    let (header_fg, header_label) = if total > 0 && done == total {
        (Color::Rgb(0, 200, 100), "✓ plan")
    } else {
        (Color::Rgb(220, 160, 30), "◇ plan")
    };

    let mut out: Vec<ListItem<'static>> = Vec::new();

    out.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{header_label}  "),
            Style::default().fg(header_fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{done}/{total}"), Style::default().fg(Color::Rgb(120, 110, 180))),
    ])));

    out.push(ListItem::new(Line::from(vec![Span::styled(
        "  ─────────────────────────────────────",
        Style::default().fg(Color::Rgb(50, 50, 70)),
    )])));

    for task in tasks {
        let (glyph, glyph_color, desc_fg) = if task.completed {
            ("☑", Color::Rgb(0, 200, 100), Color::Rgb(110, 120, 140))
        } else {
            ("☐", Color::DarkGray, Color::Rgb(180, 180, 200))
        };
        out.push(ListItem::new(Line::from(vec![
            Span::styled(format!("  {glyph} "), Style::default().fg(glyph_color)),
            Span::styled(task.description.clone(), Style::default().fg(desc_fg)),
        ])));
    }

    out.push(ListItem::new(Line::raw("")));
    out
}

// ── Operation record ──────────────────────────────────────────────────────────

fn build_operation_items(op: &OperationRecord, term_width: u16) -> Vec<ListItem<'static>> {
    let mut out: Vec<ListItem<'static>> = Vec::new();

    let (mark, mark_color) = match op.status {
        OpStatus::Success => ("✓", Color::Rgb(0, 200, 100)),
        OpStatus::Error => ("✗", Color::Red),
    };
    let glyph = op_glyph(op.kind);
    let glyph_color = op_color(op.kind);

    let wrap_width = (term_width as usize).saturating_sub(8).max(20);
    let mut line_iter = op.result.lines();
    let first_line = line_iter.next().unwrap_or("");

    out.push(ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{glyph} "), Style::default().fg(glyph_color)),
        Span::styled(format!("{mark} "), Style::default().fg(mark_color)),
        Span::styled(
            first_line.chars().take(wrap_width).collect::<String>(),
            Style::default().fg(if op.status == OpStatus::Error {
                Color::Rgb(230, 120, 120)
            } else {
                Color::Rgb(180, 190, 210)
            }),
        ),
    ])));

    // Remaining output lines indented, capped so one noisy command can't
    // flood the transcript
    for line in line_iter.take(20) {
        let color = if line.contains("error") {
            Color::Red
        } else if line.contains("warning") {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        out.push(ListItem::new(Line::from(vec![
            Span::raw("      "),
            Span::styled(line.to_string(), Style::default().fg(color)),
        ])));
    }

    // Meta line: whatever the event carried
    let mut meta = Vec::new();
    if let Some(cmd) = &op.command {
        meta.push(format!("$ {cmd}"));
    }
    if let Some(path) = &op.path {
        meta.push(truncate_path(path, 40));
    }
    if let Some(url) = &op.url {
        meta.push(truncate_path(url, 40));
    }
    if let Some(code) = op.exit_code {
        meta.push(format!("exit {code}"));
    }
    if let Some(dur) = op.duration {
        meta.push(format!("{dur:.1}s"));
    }
    if !meta.is_empty() {
        out.push(ListItem::new(Line::from(vec![
            Span::raw("      "),
            Span::styled(meta.join("  ·  "), Style::default().fg(Color::Rgb(70, 70, 100))),
        ])));
    }

    out
}

// ── Draw functions ─────────────────────────────────────────────────────────────

pub fn draw_history(f: &mut Frame, state: &AppState, area: Rect) {
    let all_items = build_items(state, area.width);
    let total = all_items.len();
    let visible = area.height as usize;

    let skip = if total > visible {
        (total - visible).saturating_sub(state.scroll)
    } else {
        0
    };

    let sliced: Vec<ListItem<'static>> = all_items.into_iter().skip(skip).collect();
    let list =
        List::new(sliced).block(Block::default().style(Style::default().bg(Color::Rgb(8, 8, 14))));
    f.render_widget(list, area);
}

/// Floating panel over the top-right of the transcript listing every
/// operation still in flight.
pub fn draw_active_ops(f: &mut Frame, state: &AppState, area: Rect) {
    let ops = &state.chat.active_ops;
    if ops.is_empty() {
        return;
    }

    let width = 36u16.min(area.width.saturating_sub(4));
    let height = (ops.len() as u16 + 2).min(area.height);
    let panel = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y,
        width,
        height,
    };

    let glyph = SPINNER_GLYPHS[(state.spinner_tick as usize) % SPINNER_GLYPHS.len()];
    let lines: Vec<Line> = ops
        .iter()
        .map(|op| {
            let desc: String =
                op.description.chars().take((width as usize).saturating_sub(5)).collect();
            Line::from(vec![
                Span::styled(format!("{glyph} "), Style::default().fg(Color::Cyan)),
                Span::styled(desc, Style::default().fg(Color::Rgb(170, 180, 200))),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(60, 60, 90)))
        .title(Span::styled(" working ", Style::default().fg(Color::Cyan)))
        .style(Style::default().bg(Color::Rgb(12, 12, 22)));

    f.render_widget(Paragraph::new(lines).block(block), panel);
}

// ── Utilities ──────────────────────────────────────────────────────────────────

/// Word-wrap a single line of text to `max_width` columns.
/// Splits on whitespace; never truncates mid-word unless the word alone exceeds max_width.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.chars().count();
        if current_width == 0 {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(current.clone());
            current = word.to_string();
            current_width = word_width;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn truncate_path(path: &str, max: usize) -> String {
    if path.chars().count() <= max {
        path.to_string()
    } else {
        let tail: String = path
            .chars()
            .rev()
            .take(max - 1)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("…{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_splits_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_text_empty_line_is_preserved() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_path_keeps_tail() {
        assert_eq!(truncate_path("short.py", 20), "short.py");
        let t = truncate_path("src/very/deep/nested/module.py", 12);
        assert_eq!(t.chars().count(), 12);
        assert!(t.starts_with('…'));
        assert!(t.ends_with("module.py"));
    }
}
