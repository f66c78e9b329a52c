use std::process::ExitCode;

use promotrack_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use promotrack_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

fn main() -> ExitCode {
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }
    promotrack_cli::run()
}
