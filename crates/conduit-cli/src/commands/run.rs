//! Action execution command

use crate::{
    cli::OutputFormat,
    context::AppContext,
    error::{CliError, CliResult},
    utils::{display_value, format_duration_ms, parse_assignments, ColoredOutput},
};
use chrono::Local;
use conduit_core::FormValues;
use conduit_runtime::ExecutionResult;
use conduit_schema::autofill;
use tracing::info;

pub struct RunOptions {
    pub values: Vec<String>,
    pub demo: bool,
    pub template: Option<String>,
    pub save_template: Option<String>,
    pub format: OutputFormat,
}

pub async fn run(ctx: &mut AppContext, connector_id: &str, action_id: &str, options: RunOptions) -> CliResult<()> {
    let assigned = parse_assignments(&options.values)?;

    let connector = ctx.session.find_connector(connector_id).await?;
    ctx.session.select_connector(connector).await;
    let schema = ctx.session.select_action(action_id).await?.schema.clone();

    if let Some(template) = &options.template {
        let applied = ctx.session.apply_template(template).await?;
        info!(template = %applied.name, "template applied");
    }
    ctx.session.set_values(assigned);

    if options.demo {
        let today = Local::now().date_naive();
        let missing: FormValues = autofill(&schema, today)
            .into_iter()
            .filter(|(name, _)| !ctx.session.form_values().contains_key(name))
            .collect();
        ctx.session.set_values(missing);
    }

    if let Some(name) = &options.save_template {
        let saved = ctx.session.save_template(name).await?;
        println!("{} {}", ColoredOutput::success("Saved template:"), saved.name);
    }

    let result = ctx.session.execute().await?;
    display_result(result, &options.format)
}

/// Print an execution result; failures are returned as errors after printing
pub fn display_result(result: &ExecutionResult, format: &OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Pretty => {
            if result.success {
                println!("{}", ColoredOutput::success("✓ Success"));
                if let Some(data) = &result.data {
                    println!("{}", serde_json::to_string_pretty(data)?);
                }
                let credential = result.metadata.credential_id.as_deref().unwrap_or("-");
                println!(
                    "{}",
                    ColoredOutput::dim(&format!(
                        "credential {} · {}",
                        credential,
                        format_duration_ms(result.metadata.duration_ms)
                    ))
                );
            }
        }
        _ => println!("{}", format.format_json(&serde_json::to_value(result)?)?),
    }

    if result.success {
        return Ok(());
    }
    let message = result.error.clone().unwrap_or_else(|| "unknown error".to_string());
    if result.is_cancelled() {
        println!("{}", ColoredOutput::warning(&message));
        return Ok(());
    }
    Err(CliError::ExecutionFailed(message))
}

/// Show the values currently in the form
pub fn display_values(values: &FormValues) {
    if values.is_empty() {
        println!("{}", ColoredOutput::dim("(no values)"));
        return;
    }
    for (name, value) in values {
        println!("  {:<28} {}", name, display_value(value));
    }
}
