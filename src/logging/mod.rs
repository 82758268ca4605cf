//! Tracing setup for the scanner.
//!
//! Production environments get structured JSON lines; everything else gets
//! human-readable ANSI output. Filtering honors `RUST_LOG` and defaults to
//! `info`.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match get_environment().as_str() {
        "production" | "prod" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stdout))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stdout))
                .init();
        }
    }
}
