//! Utility functions for the CLI

use crate::error::{CliError, CliResult};
use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use conduit_core::FormValues;
use serde_json::Value as JsonValue;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize tracing; `RUST_LOG` wins over the verbosity flag
pub fn init_tracing(verbose: bool) -> CliResult<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::General(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

/// Utility for colored console output
pub struct ColoredOutput;

impl ColoredOutput {
    pub fn success(msg: &str) -> ColoredString {
        msg.green().bold()
    }

    pub fn error(msg: &str) -> ColoredString {
        msg.red().bold()
    }

    pub fn warning(msg: &str) -> ColoredString {
        msg.yellow().bold()
    }

    pub fn info(msg: &str) -> ColoredString {
        msg.blue()
    }

    pub fn dim(msg: &str) -> ColoredString {
        msg.dimmed()
    }

    pub fn highlight(msg: &str) -> ColoredString {
        msg.cyan().bold()
    }
}

/// Format a millisecond duration in a human-readable way
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{:.1}m", ms as f64 / 60_000.0)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a `NAME=VALUE` assignment; the value is kept as entered
pub fn parse_assignment(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got '{}'", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in '{}'", raw);
    }
    Ok((name.to_string(), value.to_string()))
}

/// Collect `--value` arguments into form values
pub fn parse_assignments(raw: &[String]) -> CliResult<FormValues> {
    let mut values = FormValues::new();
    for entry in raw {
        let (name, value) = parse_assignment(entry).context("invalid --value")?;
        values.insert(name, JsonValue::String(value));
    }
    Ok(values)
}

/// Render a form value the way it would be typed
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignments() {
        let values = parse_assignments(&["user.email=a@b.com".into(), "note=x=y".into(), "empty=".into()]).unwrap();
        assert_eq!(values["user.email"], "a@b.com");
        assert_eq!(values["note"], "x=y");
        assert_eq!(values["empty"], "");

        let err = parse_assignments(&["novalue".into()]).unwrap_err();
        assert!(err.to_string().contains("invalid --value"));
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_truncate_and_display() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a much longer name", 10), "a much ...");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(format_duration_ms(1500), "1.5s");
    }
}
