//! Before/after rendering for fix previews.

/// Renders a human-readable diff of old and new NAME fact text.
pub trait DiffRenderer {
    fn render(&self, old: &str, new: &str) -> String;
}

/// Line-by-line renderer.
///
/// Name rewrites never add or drop lines, so lines are compared pairwise:
/// unchanged lines get a two-space prefix, changed ones a `- `/`+ ` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineDiff;

impl DiffRenderer for LineDiff {
    fn render(&self, old: &str, new: &str) -> String {
        let old_lines: Vec<&str> = old.lines().collect();
        let new_lines: Vec<&str> = new.lines().collect();
        let mut rendered = Vec::new();

        for index in 0..old_lines.len().max(new_lines.len()) {
            match (old_lines.get(index), new_lines.get(index)) {
                (Some(before), Some(after)) if before == after => {
                    rendered.push(format!("  {before}"));
                }
                (before, after) => {
                    if let Some(before) = before {
                        rendered.push(format!("- {before}"));
                    }
                    if let Some(after) = after {
                        rendered.push(format!("+ {after}"));
                    }
                }
            }
        }

        rendered.join("\n")
    }
}
