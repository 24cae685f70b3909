//! Guided menu-driven session
//!
//! The menu is the only task the runtime drives, so its prompts block inline.
//! Prompts raised from inside the acquisition flow go through `prompt::blocking_prompt`.

use crate::{
    commands::{
        connectors::{describe_field, display_schema},
        history::print_history,
        run::{display_result, display_values},
    },
    cli::OutputFormat,
    context::AppContext,
    error::CliResult,
    utils::{display_value, ColoredOutput},
};
use chrono::Local;
use conduit_core::{Connector, FieldDescriptor};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde_json::Value as JsonValue;

pub async fn run(ctx: &mut AppContext) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    if let Some(user_id) = ctx.session_config.load().await?.user_id {
        println!("{} {}", ColoredOutput::dim("Signed in as"), user_id);
    }
    ctx.session.load_connectors().await?;

    let menu = ["Run an action", "Manage credentials", "Recent activity", "API inspector", "Quit"];
    loop {
        println!();
        let choice = Select::with_theme(&theme).with_prompt("What next?").items(&menu).default(0).interact_opt()?;
        let outcome = match choice {
            Some(0) => run_action(ctx, &theme).await,
            Some(1) => manage_credentials(ctx, &theme).await,
            Some(2) => recent_activity(ctx, &theme).await,
            Some(3) => {
                print_history(ctx.client.history(), false).await;
                Ok(())
            }
            _ => return Ok(()),
        };
        if let Err(e) = outcome {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
        }
    }
}

async fn pick_connector(ctx: &AppContext, theme: &ColorfulTheme) -> CliResult<Option<Connector>> {
    let query: String = Input::with_theme(theme)
        .with_prompt("Search connectors (empty for all)")
        .allow_empty(true)
        .interact_text()?;

    let categories = ctx.session.categories();
    let category = match Select::with_theme(theme).with_prompt("Category").items(&categories).default(0).interact_opt()? {
        Some(index) => categories[index].clone(),
        None => return Ok(None),
    };

    let matches = ctx.session.filtered_connectors(query.trim(), &category);
    if matches.is_empty() {
        println!("{}", ColoredOutput::info("No connectors found"));
        return Ok(None);
    }
    let labels: Vec<String> = matches
        .iter()
        .map(|s| {
            let state = if s.is_connected() { "connected" } else { "not connected" };
            format!("{} ({})", s.connector.label(), state)
        })
        .collect();
    let picked = Select::with_theme(theme).with_prompt("Connector").items(&labels).default(0).interact_opt()?;
    Ok(picked.map(|index| matches[index].connector.clone()))
}

async fn run_action(ctx: &mut AppContext, theme: &ColorfulTheme) -> CliResult<()> {
    let Some(connector) = pick_connector(ctx, theme).await? else {
        return Ok(());
    };
    let resources = ctx.session.select_connector(connector).await;

    let actions: Vec<(String, String)> = resources
        .iter()
        .flat_map(|r| r.actions.iter().map(move |a| (a.id.clone(), format!("{} / {}", r.label(), a.label()))))
        .collect();
    if actions.is_empty() {
        println!("{}", ColoredOutput::info("No actions available"));
        return Ok(());
    }
    let labels: Vec<&str> = actions.iter().map(|(_, label)| label.as_str()).collect();
    let Some(index) = Select::with_theme(theme).with_prompt("Action").items(&labels).default(0).interact_opt()? else {
        return Ok(());
    };

    ctx.session.select_action(&actions[index].0).await?;
    fill_and_execute(ctx, theme).await
}

async fn fill_and_execute(ctx: &mut AppContext, theme: &ColorfulTheme) -> CliResult<()> {
    let menu = ["Edit fields", "Auto-fill demo data", "Apply template", "Save as template", "Execute", "Back"];
    loop {
        let Some(selected) = ctx.session.selected_action() else {
            return Ok(());
        };
        println!();
        display_schema(&selected.schema);
        println!();
        display_values(ctx.session.form_values());

        let choice = Select::with_theme(theme).with_prompt("Form").items(&menu).default(0).interact_opt()?;
        match choice {
            Some(0) => edit_fields(ctx, theme)?,
            Some(1) => {
                let filled = ctx.session.autofill(Local::now().date_naive())?;
                println!("{}", ColoredOutput::success(&format!("Filled {} field(s)", filled)));
            }
            Some(2) => {
                let name: String = Input::with_theme(theme).with_prompt("Template name or id").interact_text()?;
                ctx.session.apply_template(name.trim()).await?;
            }
            Some(3) => {
                let name: String = Input::with_theme(theme).with_prompt("Template name").interact_text()?;
                let saved = ctx.session.save_template(&name).await?;
                println!("{} {}", ColoredOutput::success("Saved template:"), saved.name);
            }
            Some(4) => {
                let result = ctx.session.execute().await?;
                if let Err(e) = display_result(result, &OutputFormat::Pretty) {
                    eprintln!("{} {}", ColoredOutput::error("Error:"), e);
                }
                let again = Confirm::with_theme(theme).with_prompt("Run again?").default(false).interact()?;
                if !again {
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
    }
}

fn edit_fields(ctx: &mut AppContext, theme: &ColorfulTheme) -> CliResult<()> {
    let Some(selected) = ctx.session.selected_action() else {
        return Ok(());
    };
    let fields: Vec<FieldDescriptor> = selected.schema.all_fields().cloned().collect();

    for field in &fields {
        let current = ctx.session.form_values().get(&field.name).map(display_value).unwrap_or_default();
        if let Some(description) = &field.description {
            println!("{}", ColoredOutput::dim(description));
        }
        let value = match &field.options {
            Some(options) => {
                let mut labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
                labels.push("(leave empty)".to_string());
                let default = options.iter().position(|o| o.value == current).unwrap_or(options.len());
                let prompt = describe_field(field);
                match Select::with_theme(theme).with_prompt(prompt).items(&labels).default(default).interact_opt()? {
                    Some(index) if index < options.len() => options[index].value.clone(),
                    Some(_) => String::new(),
                    None => current,
                }
            }
            None => {
                let label = if field.required { format!("{} *", field.display_name) } else { field.display_name.clone() };
                Input::with_theme(theme)
                    .with_prompt(label)
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?
            }
        };
        ctx.session.set_value(field.name.clone(), JsonValue::String(value));
    }
    Ok(())
}

async fn manage_credentials(ctx: &mut AppContext, theme: &ColorfulTheme) -> CliResult<()> {
    let Some(connector) = pick_connector(ctx, theme).await? else {
        return Ok(());
    };
    let status = ctx.session.connector_status(&connector.id).cloned();
    let connected = status.as_ref().is_some_and(|s| s.is_connected());

    let menu: &[&str] = if connected {
        &["Test connection", "Reconnect", "Disconnect", "Back"]
    } else {
        &["Connect", "Back"]
    };
    let Some(index) = Select::with_theme(theme).with_prompt(connector.label()).items(menu).default(0).interact_opt()? else {
        return Ok(());
    };

    match menu[index] {
        "Connect" => {
            if ctx.session.connect(&connector.id).await?.is_some() {
                println!("{}", ColoredOutput::success("✓ Connected successfully!"));
            }
        }
        "Reconnect" => {
            ctx.session.reconnect(&connector.id).await?;
            println!("{}", ColoredOutput::success("✓ Reconnected successfully!"));
        }
        "Disconnect" => {
            let credential_id = status.and_then(|s| s.credentials.first().map(|c| c.id.clone()));
            let Some(credential_id) = credential_id else {
                return Ok(());
            };
            let sure = Confirm::with_theme(theme)
                .with_prompt("Are you sure you want to disconnect? This cannot be undone.")
                .default(false)
                .interact()?;
            if sure {
                ctx.session.disconnect(&connector.id, &credential_id).await?;
                println!("{}", ColoredOutput::success("✓ Disconnected successfully!"));
            }
        }
        "Test connection" => {
            ctx.session.test_connection(&connector.id).await?;
            println!(
                "{} {} is connected and working properly.",
                ColoredOutput::success("✓ Connection Successful!"),
                connector.label()
            );
        }
        _ => {}
    }
    Ok(())
}

async fn recent_activity(ctx: &mut AppContext, theme: &ColorfulTheme) -> CliResult<()> {
    let records = ctx.session.activity_log().list().await?;
    if records.is_empty() {
        println!("{}", ColoredOutput::info("No recent activity"));
        return Ok(());
    }
    let labels: Vec<String> = records
        .iter()
        .map(|r| {
            let outcome = if r.success { "ok" } else { "failed" };
            format!(
                "{}  {} / {}  [{}]",
                r.timestamp.with_timezone(&Local).format("%m-%d %H:%M"),
                r.connector_name,
                r.action_name,
                outcome
            )
        })
        .collect();
    let Some(index) = Select::with_theme(theme).with_prompt("Re-run").items(&labels).default(0).interact_opt()? else {
        return Ok(());
    };

    ctx.session.rerun(&records[index].id).await?;
    fill_and_execute(ctx, theme).await
}
