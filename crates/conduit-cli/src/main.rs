//! Conduit CLI main entry point

use clap::Parser;
use conduit_cli::{
    cli::{Cli, Commands},
    commands::{self, print_history, RunOptions},
    context::AppContext,
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::debug;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Disable colored output if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("Conduit CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { command } = &cli.command {
        return commands::config::run(&cli, command).await;
    }

    let interactive = matches!(cli.command, Commands::Interactive);
    let mut ctx = AppContext::build(&cli, interactive).await?;

    let result = match cli.command {
        Commands::Interactive => commands::interactive::run(&mut ctx).await,
        Commands::Connectors { command } => commands::connectors::run(&mut ctx, command).await,
        Commands::Resources { connector, format } => {
            commands::connectors::resources(&ctx, &connector, format).await
        }
        Commands::Schema { connector, action, format } => {
            commands::connectors::schema(&mut ctx, &connector, &action, format).await
        }
        Commands::Run { connector, action, values, demo, template, save_template, format } => {
            let options = RunOptions { values, demo, template, save_template, format };
            commands::run::run(&mut ctx, &connector, &action, options).await
        }
        Commands::Credentials { command } => commands::credentials::run(&mut ctx, command).await,
        Commands::Activity { command } => commands::activity::run(&mut ctx, command).await,
        Commands::Templates { command } => commands::templates::run(&ctx, command).await,
        Commands::Config { .. } => Ok(()),
    };

    if cli.inspect {
        print_history(ctx.client.history(), cli.verbose).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_cli::cli::{ActivityCommand, ConnectorsCommand, CredentialsCommand, OutputFormat};

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "conduit",
            "--data-dir",
            "/tmp/conduit",
            "--api-key",
            "key",
            "--user-id",
            "user",
            "connectors",
            "list",
            "--search",
            "crm",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, "/tmp/conduit");
        assert_eq!(cli.api_key.as_deref(), Some("key"));
        assert_eq!(cli.base_url, "https://production.runalloy.com");
        if let Commands::Connectors { command: ConnectorsCommand::List { search, category, format } } = cli.command {
            assert_eq!(search.as_deref(), Some("crm"));
            assert_eq!(category, "all");
            assert_eq!(format, OutputFormat::Table);
        } else {
            panic!("Expected Connectors List command");
        }
    }

    #[test]
    fn test_run_command_parsing() {
        let cli = Cli::try_parse_from([
            "conduit",
            "run",
            "slack",
            "postMessage",
            "-V",
            "channel=#general",
            "--value",
            "text=hello",
            "--demo",
            "--format",
            "json",
            "--inspect",
        ])
        .unwrap();

        assert!(cli.inspect);
        if let Commands::Run { connector, action, values, demo, template, format, .. } = cli.command {
            assert_eq!(connector, "slack");
            assert_eq!(action, "postMessage");
            assert_eq!(values, vec!["channel=#general", "text=hello"]);
            assert!(demo);
            assert!(template.is_none());
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_credentials_and_activity_parsing() {
        let cli = Cli::try_parse_from(["conduit", "credentials", "disconnect", "hubspot", "--yes", "--no-browser"])
            .unwrap();
        assert!(cli.no_browser);
        assert!(matches!(
            cli.command,
            Commands::Credentials { command: CredentialsCommand::Disconnect { yes: true, credential: None, .. } }
        ));

        let cli = Cli::try_parse_from(["conduit", "activity", "rerun", "abc", "--execute"]).unwrap();
        assert!(matches!(cli.command, Commands::Activity { command: ActivityCommand::Rerun { execute: true, .. } }));
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["conduit", "resources", "slack", "--format", "xml"]).is_err());
    }
}
