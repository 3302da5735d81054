// Log subscriber setup for the binary

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a fmt subscriber writing to stderr. `RUST_LOG` wins over the
/// verbosity count when set. Stdout stays free for JSON and PNG output.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!(
            "autochart={}",
            level_from_verbosity(verbosity).as_str().to_lowercase()
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
