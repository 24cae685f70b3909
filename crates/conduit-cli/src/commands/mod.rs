pub mod activity;
pub mod config;
pub mod connectors;
pub mod credentials;
pub mod history;
pub mod interactive;
pub mod run;
pub mod templates;

pub use history::print_history;
pub use run::RunOptions;
