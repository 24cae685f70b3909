//! Recent activity: list, rerun, clear

use crate::{
    cli::{ActivityCommand, OutputFormat},
    commands::{connectors::display_schema, run::{display_result, display_values}},
    context::AppContext,
    error::CliResult,
    utils::{truncate_text, ColoredOutput},
};
use conduit_core::{ActivityRecord, FailureKind};
use serde_json::json;

pub async fn run(ctx: &mut AppContext, command: ActivityCommand) -> CliResult<()> {
    match command {
        ActivityCommand::List { format } => {
            let records = ctx.session.activity_log().list().await?;
            match format {
                OutputFormat::Table => display_activity(&records),
                _ => println!("{}", format.format_json(&json!({ "activity": records }))?),
            }
            Ok(())
        }
        ActivityCommand::Rerun { id, execute, format } => {
            let record = ctx.session.rerun(&id).await?;
            println!(
                "{} {} / {}",
                ColoredOutput::highlight("Restored"),
                record.connector_name,
                record.action_name
            );
            if let Some(selected) = ctx.session.selected_action() {
                display_schema(&selected.schema);
            }
            println!();
            display_values(ctx.session.form_values());

            if execute {
                println!();
                let result = ctx.session.execute().await?;
                display_result(result, &format)?;
            }
            Ok(())
        }
        ActivityCommand::Clear => {
            ctx.session.activity_log().clear().await?;
            println!("{}", ColoredOutput::success("Activity cleared"));
            Ok(())
        }
    }
}

fn outcome_label(record: &ActivityRecord) -> String {
    match (record.success, record.failure) {
        (true, _) => ColoredOutput::success("success").to_string(),
        (false, Some(FailureKind::Cancelled)) => ColoredOutput::warning("cancelled").to_string(),
        (false, _) => ColoredOutput::error("failed").to_string(),
    }
}

fn display_activity(records: &[ActivityRecord]) {
    if records.is_empty() {
        println!("{}", ColoredOutput::info("No recent activity"));
        return;
    }

    println!(
        "{:<38} {:<17} {:<20} {:<28} {}",
        ColoredOutput::highlight("ID"),
        ColoredOutput::highlight("When"),
        ColoredOutput::highlight("Connector"),
        ColoredOutput::highlight("Action"),
        ColoredOutput::highlight("Result")
    );
    println!("{}", "-".repeat(115));
    for record in records {
        println!(
            "{:<38} {:<17} {:<20} {:<28} {}",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            truncate_text(&record.connector_name, 20),
            truncate_text(&record.action_name, 28),
            outcome_label(record)
        );
    }
}
