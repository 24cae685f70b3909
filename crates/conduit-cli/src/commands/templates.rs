use crate::{
    cli::{OutputFormat, TemplatesCommand},
    context::AppContext,
    error::{CliError, CliResult},
    utils::ColoredOutput,
};
use serde_json::json;

pub async fn run(ctx: &AppContext, command: TemplatesCommand) -> CliResult<()> {
    let templates = ctx.session.templates();
    match command {
        TemplatesCommand::List { connector, action, format } => {
            let list = templates.list(connector.as_deref(), action.as_deref()).await?;
            match format {
                OutputFormat::Table => {
                    if list.is_empty() {
                        println!("{}", ColoredOutput::info("No templates saved"));
                    }
                    for template in &list {
                        println!(
                            "{:<38} {:<24} {}/{} ({} value(s))",
                            template.id,
                            template.name,
                            template.connector_id,
                            template.action_id,
                            template.form_values.len()
                        );
                    }
                }
                _ => println!("{}", format.format_json(&json!({ "templates": list }))?),
            }
            Ok(())
        }
        TemplatesCommand::Delete { id } => {
            let target = templates
                .find(&id)
                .await?
                .ok_or_else(|| CliError::InvalidArgument(format!("Template not found: {}", id)))?;
            templates.delete(&target.id).await?;
            println!("{} {}", ColoredOutput::success("Deleted template"), target.name);
            Ok(())
        }
    }
}
