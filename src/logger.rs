use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Installs a process-wide fmt subscriber for binaries and tests embedding
/// the bridge. `RUST_LOG` overrides `default_level` when set.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("could not install tracing subscriber: {err}"))?;

    Ok(())
}
