//! Bulleted list output

use super::{list_preamble, Format, RenderInput, RenderOutput, Renderer, DEFAULT_LEAD_IN};

/// Renders explanations as `* term: definition` bullets
#[derive(Debug, Clone)]
pub struct BulletListRenderer {
    lead_in: String,
}

impl Default for BulletListRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LEAD_IN)
    }
}

impl BulletListRenderer {
    /// Create a renderer with a custom lead-in line (empty for none)
    pub fn new(lead_in: impl Into<String>) -> Self {
        Self {
            lead_in: lead_in.into(),
        }
    }
}

impl Renderer for BulletListRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderOutput {
        let mut lines = list_preamble(input, &self.lead_in);

        for group in &input.groups {
            let mut bullet = format!("* {}:", group.qualified_term());
            // Lines attached below the bullet; once non-empty, later
            // explanations can no longer go inline.
            let mut attached: Vec<String> = Vec::new();

            for explanation in &group.explanations {
                if attached.is_empty() {
                    if !explanation.text.is_empty() {
                        bullet.push(' ');
                        bullet.push_str(&explanation.text);
                    }
                } else {
                    attached.push("+".to_string());
                    if !explanation.text.is_empty() {
                        attached.push(explanation.text.clone());
                    }
                }
                attached.extend(explanation.continuation_lines.iter().cloned());
            }

            lines.push(bullet);
            lines.extend(attached);
        }

        RenderOutput::new(lines, Format::Bullets)
    }
}
