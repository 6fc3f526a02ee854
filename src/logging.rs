use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "SIGCMD_LOG";

/// Initialize tracing with file output.
///
/// Logging is disabled unless `SIGCMD_LOG` names a file: stdout and stderr
/// belong to the command and its error reports. The level comes from
/// `RUST_LOG` and defaults to `debug`.
///
/// Returns false when logging stays off.
pub fn init_tracing() -> bool {
    let Some(log_path) = std::env::var_os(LOG_ENV) else {
        return false;
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file {}: {e}",
                std::path::Path::new(&log_path).display()
            );
            return false;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_ok()
}
