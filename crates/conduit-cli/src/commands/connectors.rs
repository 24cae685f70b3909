//! Connector, resource and schema listings

use crate::{
    cli::{ConnectorsCommand, OutputFormat},
    context::AppContext,
    error::CliResult,
    utils::{truncate_text, ColoredOutput},
};
use conduit_core::{ActionSchema, ConnectorStatus, FieldDescriptor, FieldLocation, Resource};
use serde_json::json;
use tracing::debug;

pub async fn run(ctx: &mut AppContext, command: ConnectorsCommand) -> CliResult<()> {
    match command {
        ConnectorsCommand::List { search, category, format } => {
            list_connectors(ctx, search.as_deref().unwrap_or(""), &category, format).await
        }
        ConnectorsCommand::Categories => {
            ctx.session.load_connectors().await?;
            for category in ctx.session.categories() {
                println!("{}", category);
            }
            Ok(())
        }
    }
}

async fn list_connectors(ctx: &mut AppContext, query: &str, category: &str, format: OutputFormat) -> CliResult<()> {
    debug!(query, category, "Listing connectors");
    ctx.session.load_connectors().await?;
    let statuses = ctx.session.filtered_connectors(query, category);

    match format {
        OutputFormat::Table => display_connectors_table(&statuses),
        _ => {
            let json_data = json!({ "connectors": statuses });
            println!("{}", format.format_json(&json_data)?);
        }
    }
    Ok(())
}

fn display_connectors_table(statuses: &[&ConnectorStatus]) {
    if statuses.is_empty() {
        println!("{}", ColoredOutput::info("No connectors found"));
        return;
    }

    println!("{}", ColoredOutput::success(&format!("Found {} connector(s):", statuses.len())));
    println!();
    println!(
        "{:<24} {:<28} {:<28} {:<16}",
        ColoredOutput::highlight("ID"),
        ColoredOutput::highlight("Name"),
        ColoredOutput::highlight("Category"),
        ColoredOutput::highlight("Status")
    );
    println!("{}", "-".repeat(100));

    for status in statuses {
        let state = if status.is_connected() {
            ColoredOutput::success(&format!("connected ({})", status.credential_count))
        } else {
            ColoredOutput::dim("not connected")
        };
        let config = if status.auth_config_required { " *" } else { "" };
        println!(
            "{:<24} {:<28} {:<28} {}{}",
            truncate_text(&status.connector.id, 24),
            truncate_text(status.connector.label(), 28),
            truncate_text(&status.connector.category.join(", "), 28),
            state,
            config
        );
    }
    if statuses.iter().any(|s| s.auth_config_required) {
        println!();
        println!("{}", ColoredOutput::dim("* extra details are asked for when connecting"));
    }
}

pub async fn resources(ctx: &AppContext, connector_id: &str, format: OutputFormat) -> CliResult<()> {
    let resources = ctx.session.api().list_resources(connector_id).await?;
    match format {
        OutputFormat::Table => display_resources(&resources),
        _ => println!("{}", format.format_json(&json!({ "resources": resources }))?),
    }
    Ok(())
}

fn display_resources(resources: &[Resource]) {
    if resources.is_empty() {
        println!("{}", ColoredOutput::info("No resources found"));
        return;
    }
    for resource in resources {
        println!("{}", ColoredOutput::highlight(resource.label()));
        if let Some(description) = &resource.description {
            println!("  {}", ColoredOutput::dim(description));
        }
        for action in &resource.actions {
            println!("  {:<32} {}", action.id, action.label());
        }
        println!();
    }
}

pub async fn schema(ctx: &mut AppContext, connector_id: &str, action_id: &str, format: OutputFormat) -> CliResult<()> {
    let connector = ctx.session.find_connector(connector_id).await?;
    ctx.session.select_connector(connector).await;
    let selected = ctx.session.select_action(action_id).await?;

    match format {
        OutputFormat::Table => {
            if selected.from_summary {
                println!("{}", ColoredOutput::warning("Full definition unavailable; showing the listing summary"));
            }
            display_schema(&selected.schema);
        }
        _ => println!("{}", format.format_json(&serde_json::to_value(&selected.schema)?)?),
    }
    Ok(())
}

pub fn display_schema(schema: &ActionSchema) {
    println!("{} {}", ColoredOutput::highlight("Method:"), schema.method);
    if schema.is_empty() {
        println!("{}", ColoredOutput::info("This action takes no inputs"));
        return;
    }
    for (title, fields) in [("Required", schema.required_fields()), ("Optional", schema.optional_fields())] {
        if fields.is_empty() {
            continue;
        }
        println!();
        println!("{}", ColoredOutput::success(&format!("{} fields:", title)));
        for field in fields {
            println!("  {}", describe_field(field));
        }
    }
}

pub fn describe_field(field: &FieldDescriptor) -> String {
    let mut line = format!("{:<28} {:<10} {:<6}", field.name, field.kind.as_str(), location_label(field));
    line.push_str(&field.display_name);
    if let Some(options) = &field.options {
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        line.push_str(&format!(" [{}]", values.join("|")));
    }
    line
}

fn location_label(field: &FieldDescriptor) -> &'static str {
    match field.location {
        FieldLocation::Path => "path",
        FieldLocation::Query => "query",
        FieldLocation::Body => "body",
    }
}
