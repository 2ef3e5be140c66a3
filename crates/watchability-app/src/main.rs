// mlbw entry point.
//
// 1. Initialize tracing (stderr, so stdout stays clean for output)
// 2. Parse the command line
// 3. Load config
// 4. Build the schedule client and run the command

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use watchability_app::app;
use watchability_app::cli::Cli;
use watchability_app::schedule::MlbStatsApi;
use watchability_core::config;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{}", failure_message(&e));
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Reported once, on stderr, whatever RUST_LOG says.
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// `Error: ` followed by the whole context chain on one line.
fn failure_message(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: stats from {}, times in {}",
        config.data_paths.stats_dir, config.schedule.timezone
    );

    let schedule =
        MlbStatsApi::from_config(&config.schedule).context("failed to build schedule client")?;
    app::run(cli.command, &config, &schedule).await
}

/// Initialize tracing to stderr.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchability=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_carries_the_context_chain() {
        let err = anyhow::anyhow!("no statistics directory for season 2025")
            .context("failed to load 2025 statistics");
        assert_eq!(
            failure_message(&err),
            "Error: failed to load 2025 statistics: no statistics directory for season 2025"
        );
    }
}
