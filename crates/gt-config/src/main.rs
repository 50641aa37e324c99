//! GT-Config entry point.
//!
//! Loads `config.json` from the working directory the same way the game
//! server does at startup, then logs the resolved value of every key the
//! server reads.  Useful for checking what a server would see before
//! starting it.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ ConfigStore::open()   -- load, reconcile, rewrite if dirty
//!  └─ log each DEFAULTS key -- value, or why it is unavailable
//! ```

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gt_config::{ConfigStore, CONFIG_FILE_NAME, DEFAULTS};

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::current_dir()
        .context("failed to resolve the working directory")?
        .join(CONFIG_FILE_NAME);

    let store = ConfigStore::open(&path);

    for entry in DEFAULTS.iter() {
        match store.get_value(entry.key, entry.value.kind()) {
            Ok(value) => info!("{} = {value}", entry.key),
            Err(e) => warn!("{e}"),
        }
    }

    let foreign = store
        .iter()
        .filter(|(key, _)| !DEFAULTS.contains(key))
        .count();
    if foreign > 0 {
        info!("{foreign} additional key(s) not read by the server");
    }

    // A failed rewrite was already logged by the store and is not fatal.
    Ok(())
}
