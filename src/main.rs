use std::process::ExitCode;

use glowfolio::config::PageConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glowfolio=info")),
        )
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => match PageConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(error = %err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => PageConfig::default(),
    };
    tracing::info!(variant = ?config.variant, "starting glowfolio");

    match glowfolio::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "glowfolio exited with an error");
            ExitCode::FAILURE
        }
    }
}
