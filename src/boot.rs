use std::{env, str::FromStr as _};

use clap::Parser as _;
use config_rs::{Config as ConfigRs, ConfigError};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    app_info::AppInfo,
    cli::{Cli, Commands},
    commands::{migrate, serve, version},
    config::Config,
    environment::Environment,
    notifications::NotificationError,
    setup_tracing::setup_tracing_for_command,
};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";
const CONFIG_ENV_PREFIX: &str = "APP";
const CONFIG_ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum BootError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Migrations were interrupted")]
    MigrationsInterrupted,
    #[error("Failed to set up notifications: {0}")]
    Notifications(#[from] NotificationError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn boot(app_info: AppInfo) -> Result<(), BootError> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Version)) {
        version::print_version_info(app_info);
        return Ok(());
    }

    let environment = set_environment();
    let app_config = read_config(&environment)?;

    setup_tracing_for_command(cli.command.as_ref(), &app_config.tracing.log_level);

    debug!("Environment set to: {:?}", environment);
    trace!("Configuration loaded: {:?}", app_config);

    match cli.command {
        Some(Commands::Migrate { action }) => {
            migrate::handle_migrate_command(&app_config, action).await?;
        }
        Some(Commands::Version) => version::print_version_info(app_info),
        Some(Commands::Serve) | None => {
            serve::handle_serve_command(environment, app_config).await?;
        }
    }

    Ok(())
}

#[must_use]
pub fn set_environment() -> Environment {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .and_then(|s| Environment::from_str(&s).ok())
        .unwrap_or_default()
}

/// `config/{environment}.toml`, overridden by `APP__SECTION__KEY` variables.
pub fn read_config(environment: &Environment) -> Result<Config, ConfigError> {
    let config_file_name = format!("config/{environment}");

    trace!("Reading configuration from: {}", config_file_name);

    ConfigRs::builder()
        .add_source(config_rs::File::with_name(&config_file_name))
        .add_source(
            config_rs::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator(CONFIG_ENV_SEPARATOR),
        )
        .build()?
        .try_deserialize()
}
