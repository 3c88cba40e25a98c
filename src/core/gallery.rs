//! Quick-start examples offered next to the input form.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

pub const EXAMPLES: &[Example] = &[
    Example {
        title: "Mathematical Function",
        category: "Math",
        description: "Sine wave with moving particle",
        prompt: "Animate a sine wave function with a red dot moving along the curve",
    },
    Example {
        title: "Geometric Transform",
        category: "Geometry",
        description: "Shape morphing animation",
        prompt: "Transform a square into a circle, then into a triangle with smooth transitions",
    },
    Example {
        title: "Text Animation",
        category: "Text",
        description: "Animated mathematical equations",
        prompt: "Write 'Hello Manim' and then show the quadratic formula appearing below it",
    },
    Example {
        title: "Graph Theory",
        category: "Algorithm",
        description: "Algorithm visualization",
        prompt: "Create a graph with 5 nodes and animate a breadth-first search traversal",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MAX_DESCRIPTION_CHARS;

    #[test]
    fn test_every_prompt_is_submittable() {
        assert_eq!(EXAMPLES.len(), 4);
        for example in EXAMPLES {
            assert!(!example.prompt.trim().is_empty());
            assert!(example.prompt.chars().count() <= MAX_DESCRIPTION_CHARS);
        }
    }
}
