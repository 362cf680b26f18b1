//! Init d'`env_logger` : `RUST_LOG` s'il est défini, sinon un niveau par défaut.

use env_logger::{Builder, Env};

const DEFAULT_FILTER: &str = "info,actix_web=info,lms_gate=info";

pub fn init() {
    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .init();
}
