// logging_setup.rs
use anyhow::Context;
use std::fs;
use std::path::Path;

pub const LOG_CONFIG_FILE: &str = "log4rs.yaml";

/// Configures log4rs from `log4rs.yaml`; without that file logging goes
/// through env_logger and `RUST_LOG`.
pub fn setup_logging() -> anyhow::Result<()> {
    fs::create_dir_all("logs").context("creating logs directory")?;

    if Path::new(LOG_CONFIG_FILE).exists() {
        log4rs::init_file(LOG_CONFIG_FILE, Default::default())
            .with_context(|| format!("loading {}", LOG_CONFIG_FILE))?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
            .context("initializing env_logger")?;
    }
    Ok(())
}
