use std::fs::OpenOptions;

use env_logger::{Builder, Target};

use crate::config::Settings;
use crate::Result;

/// Installs a file-backed logger. Stderr is the game screen, so without a
/// configured log file nothing is installed and `log` calls are no-ops.
pub fn init(settings: &Settings) -> Result<()> {
    let path = match &settings.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::new()
        .parse_filters(&settings.log_filter)
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .ok();

    log::info!("logging to {}", path.display());
    Ok(())
}
