//! Caret position and internal scrolling for the description input.
//!
//! The text itself lives in `InputBox`; every method takes it as `buffer`.

use super::text_wrap::{
    BORDER_OFFSET, MAX_VISIBLE_LINES, inner_width, wrap_line_count, wrap_options,
};
use ratatui::layout::Rect;

pub(super) struct CursorState {
    /// Byte offset into the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line
    pub scroll_offset: u16,
    /// Box width from the last render, used for vertical movement
    pub last_content_width: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_content_width: 60,
        }
    }

    /// Wrapped (row, column) of the caret, ignoring scroll.
    fn row_col(&self, buffer: &str, content_width: u16) -> (u16, u16) {
        let width = inner_width(content_width);
        if width == 0 {
            return (0, 0);
        }
        let before = &buffer[..self.pos];
        let options = wrap_options(width);

        let mut row = textwrap::wrap(before, &options).len().saturating_sub(1) as u16;
        if before.ends_with('\n') {
            let lines = textwrap::wrap(before, &options);
            if !lines.last().is_some_and(|l| l.is_empty()) {
                row += 1;
            }
        }

        // Column is counted on the caret's logical line so trailing spaces,
        // which textwrap trims, still move the caret.
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let logical = &before[line_start..];
        let segments = textwrap::wrap(logical, &options);
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|seg| seg.chars().count())
            .sum();
        let col = logical.chars().count().saturating_sub(consumed) as u16;

        (row, col)
    }

    /// Keep the caret's row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16) {
        let total = wrap_line_count(buffer, inner_width(content_width));
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (row, _) = self.row_col(buffer, content_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen position of the caret inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = self.row_col(buffer, area.width);
        (
            area.x + BORDER_OFFSET + col,
            area.y + BORDER_OFFSET + row.saturating_sub(self.scroll_offset),
        )
    }

    /// Moves one wrapped line up (`-1`) or down (`1`), keeping the column
    /// where possible. Returns false at the first or last line.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16, content_width: u16) -> bool {
        let width = inner_width(content_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }
        let lines = textwrap::wrap(buffer, wrap_options(width));

        // Byte offset at which each wrapped line starts.
        let mut starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            // Skip separators textwrap dropped (spaces at a wrap, or a newline)
            while offset < buffer.len() && !buffer[offset..].starts_with(line.as_ref()) {
                offset = super::text_wrap::next_char_boundary(buffer, offset);
            }
            starts.push(offset);
            offset += line.len();
        }

        let current = starts
            .iter()
            .rposition(|&start| start <= self.pos)
            .unwrap_or(0);
        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < lines.len() => current + 1,
            _ => return false,
        };

        let column = buffer[starts[current]..self.pos].chars().count();
        let target_line = &lines[target];
        let byte_in_line = target_line
            .char_indices()
            .nth(column)
            .map_or(target_line.len(), |(i, _)| i);
        self.pos = starts[target] + byte_in_line;
        true
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 14 wide box → 10 columns of text
    const WIDTH: u16 = 14;

    #[test]
    fn caret_row_col_follows_newlines() {
        let mut cursor = CursorState::new();
        let buffer = "abc\nde";
        cursor.pos = buffer.len();
        assert_eq!(cursor.row_col(buffer, WIDTH), (1, 2));

        let buffer = "abc\n";
        cursor.pos = buffer.len();
        assert_eq!(cursor.row_col(buffer, WIDTH), (1, 0));
    }

    #[test]
    fn caret_column_counts_trailing_spaces() {
        let mut cursor = CursorState::new();
        let buffer = "ab  ";
        cursor.pos = buffer.len();
        assert_eq!(cursor.row_col(buffer, WIDTH), (0, 4));
    }

    #[test]
    fn vertical_movement_between_explicit_lines() {
        let mut cursor = CursorState::new();
        let buffer = "hello\nworld";
        cursor.pos = buffer.len(); // end of "world"

        assert!(cursor.move_vertically(buffer, -1, WIDTH));
        assert_eq!(cursor.pos, 5); // end of "hello"
        assert!(!cursor.move_vertically(buffer, -1, WIDTH));

        assert!(cursor.move_vertically(buffer, 1, WIDTH));
        assert_eq!(cursor.pos, buffer.len());
        assert!(!cursor.move_vertically(buffer, 1, WIDTH));
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut cursor = CursorState::new();
        let buffer = "a\nlonger";
        cursor.pos = buffer.len();
        assert!(cursor.move_vertically(buffer, -1, WIDTH));
        assert_eq!(cursor.pos, 1);
    }

    #[test]
    fn scroll_keeps_caret_visible() {
        let mut cursor = CursorState::new();
        let buffer = "1\n2\n3\n4\n5\n6\n7\n8";
        cursor.pos = buffer.len();
        cursor.update_scroll_offset(buffer, WIDTH);
        assert_eq!(cursor.scroll_offset, 8 - MAX_VISIBLE_LINES);

        cursor.pos = 0;
        cursor.update_scroll_offset(buffer, WIDTH);
        assert_eq!(cursor.scroll_offset, 0);
    }
}
