use time::format_description::parse;
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

use crate::cli::Commands;

const TIME_FORMAT: &str = "[hour]:[minute]:[second].[subsecond digits:2]";

// Third-party targets that are too chatty at the server's level
const QUIET_TARGETS: [&str; 3] = [
    "sqlx::postgres::notice=warn",
    "sea_orm_migration::migrator=warn",
    "lettre=warn",
];

/// Install the global subscriber. `RUST_LOG` overrides the defaults.
pub fn setup_tracing_for_command(command: Option<&Commands>, server_log_level: &str) {
    let default_level = match command {
        Some(Commands::Migrate { .. }) => "warn",
        Some(Commands::Version) => "error",
        Some(Commands::Serve) | None => server_log_level,
    };

    let env_filter = QUIET_TARGETS.iter().filter_map(|d| d.parse().ok()).fold(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        EnvFilter::add_directive,
    );

    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    match parse(TIME_FORMAT) {
        Ok(format) => subscriber.with_timer(OffsetTime::new(offset, format)).init(),
        Err(_) => subscriber.init(),
    }
}
