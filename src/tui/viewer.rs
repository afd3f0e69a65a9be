/// Modal file viewer/editor overlay opened from the Files tab.
///
/// Holds the buffer as lines with a (line, char column) cursor. Edits stay
/// local until Ctrl+S posts the joined buffer back to the backend.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Clean,
    Dirty,
    Saving,
    Saved,
    Failed,
}

#[derive(Debug)]
pub struct ViewerState {
    pub path: String,
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize, // char index within the line
    scroll: usize,
    save_state: SaveState,
    save_error: Option<String>,
}

impl ViewerState {
    pub fn new(path: String, content: String) -> Self {
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            path,
            lines,
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
            save_state: SaveState::Clean,
            save_error: None,
        }
    }

    /// Buffer joined back into the backend's representation.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    // ── Save status ───────────────────────────────────────────────────────────

    pub fn mark_saving(&mut self) {
        self.save_state = SaveState::Saving;
        self.save_error = None;
    }

    pub fn mark_saved(&mut self) {
        self.save_state = SaveState::Saved;
        self.save_error = None;
    }

    pub fn mark_save_failed(&mut self, error: &str) {
        self.save_state = SaveState::Failed;
        self.save_error = Some(error.to_string());
    }

    fn touch(&mut self) {
        self.save_state = SaveState::Dirty;
        self.save_error = None;
    }

    // ── Cursor movement ───────────────────────────────────────────────────────

    fn line_len(&self) -> usize {
        self.lines[self.cursor_line].chars().count()
    }

    fn clamp_col(&mut self) {
        let len = self.line_len();
        if self.cursor_col > len {
            self.cursor_col = len;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.clamp_col();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn page_up(&mut self, page: usize) {
        self.cursor_line = self.cursor_line.saturating_sub(page);
        self.clamp_col();
    }

    pub fn page_down(&mut self, page: usize) {
        self.cursor_line = (self.cursor_line + page).min(self.lines.len() - 1);
        self.clamp_col();
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.line_len();
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    fn byte_col(&self) -> usize {
        let line = &self.lines[self.cursor_line];
        line.char_indices().nth(self.cursor_col).map(|(i, _)| i).unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_col();
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_col += 1;
        self.touch();
    }

    pub fn insert_newline(&mut self) {
        let at = self.byte_col();
        let rest = self.lines[self.cursor_line].split_off(at);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.touch();
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = self.byte_col();
            self.lines[self.cursor_line].remove(at);
            self.touch();
        } else if self.cursor_line > 0 {
            // Join with the previous line
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len();
            self.lines[self.cursor_line].push_str(&current);
            self.touch();
        }
    }

}

// ── Drawing ───────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, viewer: &ViewerState, area: Rect) {
    // Centered overlay leaving a margin around the edges
    let margin_x = area.width / 10;
    let margin_y = area.height / 10;
    let panel = Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width.saturating_sub(margin_x * 2),
        height: area.height.saturating_sub(margin_y * 2),
    };

    let (status_label, status_color) = match viewer.save_state {
        SaveState::Clean => ("", Color::DarkGray),
        SaveState::Dirty => (" modified ", Color::Rgb(220, 160, 30)),
        SaveState::Saving => (" saving… ", Color::Cyan),
        SaveState::Saved => (" saved ", Color::Rgb(0, 200, 100)),
        SaveState::Failed => (" save failed ", Color::Red),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(80, 75, 130)))
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", viewer.path),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_label, Style::default().fg(status_color)),
        ]))
        .title_bottom(Line::from(Span::styled(
            " Ctrl+S save · Esc close ",
            Style::default().fg(Color::Rgb(60, 57, 90)),
        )))
        .style(Style::default().bg(Color::Rgb(10, 10, 18)));

    let inner = block.inner(panel);
    f.render_widget(Clear, panel);
    f.render_widget(block, panel);

    let visible = inner.height as usize;
    // The cursor may have moved since the last draw; recompute the window
    // without mutating shared state
    let scroll = {
        let mut s = viewer.scroll;
        if viewer.cursor_line < s {
            s = viewer.cursor_line;
        } else if visible > 0 && viewer.cursor_line >= s + visible {
            s = viewer.cursor_line - visible + 1;
        }
        s
    };

    let gutter_w = viewer.lines.len().to_string().len().max(3);
    let lines: Vec<Line> = viewer
        .lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(i, text)| {
            let current = i == viewer.cursor_line;
            let num_fg = if current { Color::Rgb(140, 130, 200) } else { Color::Rgb(50, 47, 75) };
            let text_fg = if current { Color::White } else { Color::Rgb(190, 190, 210) };
            Line::from(vec![
                Span::styled(format!("{:>gutter_w$} ", i + 1), Style::default().fg(num_fg)),
                Span::styled(text.clone(), Style::default().fg(text_fg)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);

    if let Some(error) = &viewer.save_error {
        let error_area = Rect {
            x: inner.x,
            y: inner.y + inner.height.saturating_sub(1),
            width: inner.width,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("✗ {error}"),
                Style::default().fg(Color::Red),
            ))),
            error_area,
        );
    }

    // Terminal cursor at the edit position
    use unicode_width::UnicodeWidthStr;
    let line = &viewer.lines[viewer.cursor_line];
    let before: String = line.chars().take(viewer.cursor_col).collect();
    let cursor_x = inner.x + gutter_w as u16 + 1 + before.width() as u16;
    let cursor_y = inner.y + (viewer.cursor_line - scroll) as u16;
    if cursor_x < inner.x + inner.width && cursor_y < inner.y + inner.height {
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(content: &str) -> ViewerState {
        ViewerState::new("test.py".to_string(), content.to_string())
    }

    #[test]
    fn insert_and_backspace_round_trip() {
        let mut v = viewer("hello");
        v.move_end();
        v.insert_char('!');
        assert_eq!(v.content(), "hello!");
        v.backspace();
        assert_eq!(v.content(), "hello");
    }

    #[test]
    fn newline_splits_and_backspace_rejoins() {
        let mut v = viewer("hello world");
        for _ in 0..6 {
            v.move_right();
        }
        v.insert_newline();
        assert_eq!(v.content(), "hello \nworld");
        assert_eq!(v.cursor_line, 1);
        assert_eq!(v.cursor_col, 0);

        v.backspace();
        assert_eq!(v.content(), "hello world");
        assert_eq!(v.cursor_line, 0);
        assert_eq!(v.cursor_col, 6);
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut v = viewer("long line here\nab");
        v.move_end();
        v.move_down();
        assert_eq!(v.cursor_col, 2); // clamped to "ab"
    }

    #[test]
    fn non_ascii_edits_stay_on_char_boundaries() {
        let mut v = viewer("héllo");
        v.move_right();
        v.move_right();
        v.insert_char('x');
        assert_eq!(v.content(), "héxllo");
        v.backspace();
        assert_eq!(v.content(), "héllo");
    }

    #[test]
    fn edits_mark_the_buffer_dirty_until_saved() {
        let mut v = viewer("x");
        assert_eq!(v.save_state, SaveState::Clean);
        v.insert_char('y');
        assert_eq!(v.save_state, SaveState::Dirty);
        v.mark_saving();
        v.mark_saved();
        assert_eq!(v.save_state, SaveState::Saved);
        v.mark_save_failed("boom");
        assert_eq!(v.save_state, SaveState::Failed);
        assert_eq!(v.save_error.as_deref(), Some("boom"));
    }

    #[test]
    fn empty_content_still_has_one_line() {
        let v = viewer("");
        assert_eq!(v.content(), "");
        assert_eq!(v.lines.len(), 1);
    }
}
