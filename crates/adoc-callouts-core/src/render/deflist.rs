//! Definition list output
//!
//! ```asciidoc
//! where:
//!
//! `<pod-name>`::
//! Specifies the name of the pod.
//! ```

use super::{list_preamble, Format, RenderInput, RenderOutput, Renderer, DEFAULT_LEAD_IN};

/// Renders explanations as an AsciiDoc definition list
#[derive(Debug, Clone)]
pub struct DefinitionListRenderer {
    lead_in: String,
}

impl Default for DefinitionListRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LEAD_IN)
    }
}

impl DefinitionListRenderer {
    /// Create a renderer with a custom lead-in line (empty for none)
    pub fn new(lead_in: impl Into<String>) -> Self {
        Self {
            lead_in: lead_in.into(),
        }
    }
}

impl Renderer for DefinitionListRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderOutput {
        let mut lines = list_preamble(input, &self.lead_in);

        for (index, group) in input.groups.iter().enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            lines.push(format!("{}::", group.qualified_term()));

            for (position, explanation) in group.explanations.iter().enumerate() {
                if position > 0 {
                    lines.push("+".to_string());
                }
                lines.extend(explanation.lines().map(str::to_string));
            }
        }

        RenderOutput::new(lines, Format::Deflist)
    }
}
