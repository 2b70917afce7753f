//! Tracing initialisation.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static TRACING_INIT: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `filter`.
///
/// Does nothing when `filter` is `None`, is invalid, or a subscriber has
/// already been installed. Safe to call more than once.
pub fn init_tracing(filter: Option<&str>) {
    let Some(filter) = filter else {
        return;
    };
    TRACING_INIT.call_once(|| match EnvFilter::try_new(filter) {
        Ok(filter) => {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .try_init();
        }
        Err(err) => eprintln!("ignoring invalid log filter `{filter}`: {err}"),
    });
}
