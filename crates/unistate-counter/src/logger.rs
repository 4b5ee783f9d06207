//! Log file for the demo
//!
//! The terminal belongs to the UI, so logs go to `unistate-counter-<timestamp>.log` in the
//! working directory (debug builds) or the user cache directory (release builds).

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Debug;

fn log_dir() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::new();
    }
    unistate_config::cache_dir().unwrap_or_default()
}

/// A configured level wins over `RUST_LOG`
///
/// Also returns the `RUST_LOG` value when it names no level.
fn pick_level(
    configured: Option<LevelFilter>,
    env: Option<&str>,
) -> (LevelFilter, Option<String>) {
    if let Some(level) = configured {
        return (level, None);
    }

    match env.map(str::trim) {
        None | Some("") => (DEFAULT_LEVEL, None),
        Some(value) => match LevelFilter::from_str(value) {
            Ok(level) => (level, None),
            Err(_) => (DEFAULT_LEVEL, Some(value.to_string())),
        },
    }
}

/// Install the file logger and return the path it writes to
pub fn init(configured: Option<LevelFilter>) -> Result<PathBuf> {
    let env = std::env::var("RUST_LOG").ok();
    let (level, rejected) = pick_level(configured, env.as_deref());

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = log_dir().join(format!("unistate-counter-{stamp}.log"));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    // stays on UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();
    WriteLogger::init(level, builder.build(), file).context("Failed to initialize logger")?;

    if let Some(value) = rejected {
        log::warn!("RUST_LOG=`{}` names no level, logging at {}", value, level);
    }
    Ok(path)
}
