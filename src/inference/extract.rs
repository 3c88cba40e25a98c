//! Pulls the generated script out of a raw model response.

/// Opening fences accepted, longest first so `python` wins over `py`.
const OPENING_FENCES: &[&str] = &["```python\n", "```py\n"];
const CLOSING_FENCE: &str = "```";

/// Returns the contents of the first fenced Python block in `raw`, or all of
/// `raw` when there is none. Whitespace inside the block is kept as-is.
pub fn extract_code(raw: &str) -> &str {
    OPENING_FENCES
        .iter()
        .filter_map(|fence| raw.find(fence).map(|start| start + fence.len()))
        .min()
        .and_then(|body_start| {
            raw[body_start..]
                .find(CLOSING_FENCE)
                .map(|len| &raw[body_start..body_start + len])
        })
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_fenced_block_exactly() {
        let raw = "Here you go:\n```python\nfrom manim import *\n\n  x = 1\n```\nEnjoy!";
        assert_eq!(extract_code(raw), "from manim import *\n\n  x = 1\n");
    }

    #[test]
    fn test_no_fence_returns_raw_response() {
        let raw = "from manim import *\nclass A(Scene): pass";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn test_unterminated_fence_returns_raw_response() {
        let raw = "```python\nfrom manim import *";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn test_first_block_wins() {
        let raw = "```python\nfirst\n```\n```python\nsecond\n```";
        assert_eq!(extract_code(raw), "first\n");
    }

    #[test]
    fn test_short_py_fence_is_accepted() {
        assert_eq!(extract_code("```py\nprint(1)\n```"), "print(1)\n");
    }

    #[test]
    fn test_other_languages_are_not_extracted() {
        let raw = "```rust\nfn main() {}\n```";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn test_empty_block_extracts_empty_string() {
        assert_eq!(extract_code("```python\n```"), "");
    }
}
