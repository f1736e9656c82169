//! Rendering of command results for the terminal.

use crate::context::CommandResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render a result as text (output, then change summary) or as one JSON line.
pub fn render(result: &CommandResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(result)
            .unwrap_or_else(|e| format!("{{\"error\":\"failed to serialize result: {e}\"}}")),
        OutputFormat::Text => {
            let summary = result.context().summary();
            [result.output(), summary.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
