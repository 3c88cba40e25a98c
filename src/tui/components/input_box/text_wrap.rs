//! Wrapping helpers and box dimensions for the description input.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before the box scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 6;
/// Offset from area edge to content (border width)
pub(super) const BORDER_OFFSET: u16 = 1;

/// Word wrapping that still breaks words longer than the line.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Width left for text inside the box, 0 when too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Number of wrapped lines `text` occupies. A trailing newline starts a new
/// (empty) line even when textwrap does not emit one.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count + 1
    } else {
        count
    }
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_of_empty_and_narrow_input() {
        assert_eq!(wrap_line_count("", 40), 1);
        assert_eq!(wrap_line_count("spin a cube", 0), 1);
    }

    #[test]
    fn line_count_wraps_and_counts_newlines() {
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
        assert_eq!(wrap_line_count("a\nb\nc", 40), 3);
        assert_eq!(wrap_line_count("circle\n", 40), 2);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        let s = "π≈3";
        assert_eq!(next_char_boundary(s, 0), 2);
        assert_eq!(next_char_boundary(s, 2), 5);
        assert_eq!(next_char_boundary(s, s.len()), s.len());
        assert_eq!(prev_char_boundary(s, s.len()), 5);
        assert_eq!(prev_char_boundary(s, 2), 0);
    }
}
