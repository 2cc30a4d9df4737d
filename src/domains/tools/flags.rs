//! Command-line flag parsing and help rendering, driven by a tool's schema.
//!
//! Every flag is a single `-` followed by a parameter name, and consumes
//! exactly the next token as its value: `-folder src -recursive false`.
//! There are no bare boolean flags at this layer.

use serde_json::Value;

use super::args::RawArgs;
use super::error::ToolError;
use super::registry::ToolDescriptor;
use super::schema::Schema;

const FLAG_MARKER: char = '-';

/// Turn a flat token list into raw arguments.
///
/// The result still needs [`validate`](super::coercion::validate) for
/// typing and required-ness.
pub fn parse_flags<S: AsRef<str>>(tokens: &[S], schema: &Schema) -> Result<RawArgs, ToolError> {
    let mut raw = RawArgs::new();
    let mut tokens = tokens.iter().map(AsRef::as_ref);

    while let Some(token) = tokens.next() {
        let Some(name) = token.strip_prefix(FLAG_MARKER) else {
            return Err(ToolError::UnexpectedPositionalToken(token.to_string()));
        };

        if !schema.contains(name) {
            return Err(ToolError::unknown_parameter(name));
        }

        let value = tokens
            .next()
            .ok_or_else(|| ToolError::MalformedFlag(name.to_string()))?;

        raw.insert(name.to_string(), Value::String(value.to_string()));
    }

    Ok(raw)
}

/// Format a tool's schema as usage text.
pub fn render_help(descriptor: &ToolDescriptor, program: &str) -> String {
    let title = format!("Tool: {}", descriptor.name());
    let underline = "=".repeat(title.chars().count());
    let mut lines = vec![
        title,
        underline,
        format!("Description: {}", descriptor.description()),
        String::new(),
    ];

    let schema = descriptor.schema();
    if schema.is_empty() {
        lines.push("This tool takes no parameters.".to_string());
        lines.push(String::new());
    } else {
        lines.push("Parameters:".to_string());
        for (name, spec) in schema.iter() {
            let tag = if spec.required { "required" } else { "optional" };
            let default = match spec.effective_default() {
                Some(Value::String(s)) => format!(" (default: {s})"),
                Some(other) => format!(" (default: {other})"),
                None => String::new(),
            };
            lines.push(format!("  {FLAG_MARKER}{name} ({}) [{tag}]{default}", spec.param_type));
            lines.push(format!("    {}", spec.description));
            lines.push(String::new());
        }
    }

    lines.push("Usage:".to_string());
    lines.push(format!("  {}", usage_line(descriptor, program)));
    lines.join("\n")
}

/// `program tool -req <value> [-opt <value>]`, required flags first.
pub fn usage_line(descriptor: &ToolDescriptor, program: &str) -> String {
    let schema = descriptor.schema();
    let required = schema
        .iter()
        .filter(|(_, spec)| spec.required)
        .map(|(name, _)| format!("{FLAG_MARKER}{name} <value>"));
    let optional = schema
        .iter()
        .filter(|(_, spec)| !spec.required)
        .map(|(name, _)| format!("[{FLAG_MARKER}{name} <value>]"));

    [program.to_string(), descriptor.name().to_string()]
        .into_iter()
        .chain(required)
        .chain(optional)
        .collect::<Vec<_>>()
        .join(" ")
}
