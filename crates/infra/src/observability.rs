//! Tracing initialization
//!
//! `CADENCE_LOG` holds per-target levels, for example
//! `CADENCE_LOG=cadence_core=debug,cadence_infra=info`. Falls back to
//! `cadence=info` when unset or invalid. `CADENCE_LOG_FORMAT=json` switches
//! to one JSON object per line.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "CADENCE_LOG";
pub const LOG_FORMAT_ENV: &str = "CADENCE_LOG_FORMAT";
const DEFAULT_DIRECTIVES: &str = "cadence=info";

/// Install the global subscriber. Idempotent; a subscriber installed by
/// someone else first is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = env_filter();
        let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

        let installed = if json {
            tracing_subscriber::registry().with(fmt::layer().json().with_target(true)).with(filter).try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(true))
                .with(filter)
                .try_init()
        };

        if let Err(e) = installed {
            tracing::debug!(error = %e, "Tracing subscriber already installed");
        }
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}
