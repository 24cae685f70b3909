//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use conduit_auth::DEFAULT_REDIRECT_URI;
use conduit_client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use serde_json::Value as JsonValue;

#[derive(Parser)]
#[command(
    name = "conduit",
    about = "Conduit - browse connectors, fill action forms and run them against the connector API",
    version,
    author = "Conduit Team"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API key sent as a bearer token
    #[arg(long, env = "CONDUIT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// User the credentials and executions belong to
    #[arg(long, env = "CONDUIT_USER_ID", global = true)]
    pub user_id: Option<String>,

    #[arg(long, env = "CONDUIT_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    #[arg(long, env = "CONDUIT_API_VERSION", default_value = DEFAULT_API_VERSION, global = true)]
    pub api_version: String,

    /// Directory holding the local database (activity, templates, saved config)
    #[arg(long, env = "CONDUIT_DATA_DIR", default_value = "./data", global = true)]
    pub data_dir: String,

    /// Redirect URI registered for credential creation
    #[arg(long, default_value = DEFAULT_REDIRECT_URI, global = true)]
    pub redirect_uri: String,

    /// Print authorization URLs instead of opening a browser
    #[arg(long, global = true)]
    pub no_browser: bool,

    /// Print the API calls made by this command
    #[arg(long, global = true)]
    pub inspect: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Guided session: pick a connector and an action, fill the form, run it
    Interactive,

    /// List and search connectors
    Connectors {
        #[command(subcommand)]
        command: ConnectorsCommand,
    },

    /// List the resources and actions of a connector
    Resources {
        connector: String,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the form fields of an action
    Schema {
        connector: String,
        action: String,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Execute an action
    Run {
        connector: String,
        action: String,

        /// Field value as NAME=VALUE (dotted names for nested body fields)
        #[arg(short = 'V', long = "value", value_name = "NAME=VALUE")]
        values: Vec<String>,

        /// Fill fields without a value with demo data
        #[arg(long)]
        demo: bool,

        /// Start from a saved template (id or name)
        #[arg(long)]
        template: Option<String>,

        /// Save the submitted values as a template
        #[arg(long, value_name = "NAME")]
        save_template: Option<String>,

        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Manage connector credentials
    Credentials {
        #[command(subcommand)]
        command: CredentialsCommand,
    },

    /// Recent executions
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },

    /// Saved form-value templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// Saved API key and user id
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConnectorsCommand {
    /// List connectors with their credential status
    List {
        /// Case-insensitive match on name and categories
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value = "all")]
        category: String,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List connector categories
    Categories,
}

#[derive(Subcommand)]
pub enum CredentialsCommand {
    List {
        connector: String,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a credential through the authorization flow
    Connect { connector: String },

    /// Run the authorization flow again
    Reconnect { connector: String },

    /// Delete a credential (the first one unless given)
    Disconnect {
        connector: String,
        credential: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check that the connector answers with its current credentials
    Test { connector: String },
}

#[derive(Subcommand)]
pub enum ActivityCommand {
    List {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Restore the connector, action and values of a recorded execution
    Rerun {
        id: String,

        /// Execute right away instead of only showing the restored form
        #[arg(long)]
        execute: bool,

        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    Clear,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    List {
        #[arg(long)]
        connector: Option<String>,

        #[arg(long)]
        action: Option<String>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Save the API key and/or user id to the local database
    Set {
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        user_id: Option<String>,
    },

    Show,

    Clear,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Format a JSON value according to the output format
    pub fn format_json(&self, value: &JsonValue) -> Result<String, serde_json::Error> {
        match self {
            // Commands render their own tables; anything else falls back to pretty JSON
            Self::Table | Self::Pretty => serde_json::to_string_pretty(value),
            Self::Json => serde_json::to_string(value),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| {
                serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("YAML serialization error: {}", e),
                ))
            }),
        }
    }
}
