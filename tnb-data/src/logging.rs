use crate::error::DataError;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Log file created inside the directory passed to [`init_logging`].
pub const LOG_FILE_NAME: &str = "log.log";

pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Initialise an INFO `Subscriber` for `Tracing` Json logs and install it as the global default.
///
/// `RUST_LOG` overrides the INFO default. If `log_dir` is provided the same Json lines are also
/// appended to `<log_dir>/log.log`.
pub fn init_logging(log_dir: Option<&Path>) -> Result<(), DataError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // Disable colours on release builds
    let stdout = fmt::layer().with_ansi(cfg!(debug_assertions)).json();

    let file = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file_path(dir))?;

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .json()
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()?;

    Ok(())
}
