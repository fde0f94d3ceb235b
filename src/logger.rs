use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local};
use colored::Colorize;
use log::{Level, LevelFilter};

/// Rotated log files kept next to the current one.
const BACKUP_COUNT: usize = 4;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

fn colored_level(level: Level) -> String {
    let name = level.to_string();
    match level {
        Level::Error => name.red().bold().to_string(),
        Level::Warn => name.yellow().to_string(),
        Level::Info => name.green().to_string(),
        Level::Debug => name.blue().to_string(),
        Level::Trace => name.dimmed().to_string(),
    }
}

/// Logs to `log_path`, and to stdout as well when `verbose` is set.
pub fn setup_logger(log_path: &Path, verbose: bool) -> Result<()> {
    rotate_if_stale(log_path, Local::now())?;

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] <{}> {}",
                Local::now().format(TIMESTAMP_FORMAT),
                record.level(),
                message
            ))
        })
        .chain(
            fern::log_file(log_path)
                .with_context(|| format!("Could not open log file {}", log_path.display()))?,
        );

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Info)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("html5ever", LevelFilter::Warn)
        .level_for("selectors", LevelFilter::Warn)
        .chain(file);

    if verbose {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{}] <{}> {}",
                        Local::now().format(TIMESTAMP_FORMAT),
                        colored_level(record.level()),
                        message
                    ))
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch.apply()?;
    Ok(())
}

/// Whether a log last written at `modified` belongs to an earlier week than `now`.
pub fn needs_rotation(modified: DateTime<Local>, now: DateTime<Local>) -> bool {
    let last = modified.iso_week();
    let current = now.iso_week();
    (last.year(), last.week()) < (current.year(), current.week())
}

fn backup_path(log_path: &Path, n: usize) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

/// Moves last week's log aside, keeping at most `BACKUP_COUNT` old files.
pub fn rotate_if_stale(log_path: &Path, now: DateTime<Local>) -> Result<bool> {
    let modified = match fs::metadata(log_path).and_then(|m| m.modified()) {
        Ok(modified) => DateTime::<Local>::from(modified),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).context("Could not inspect log file"),
    };

    if !needs_rotation(modified, now) {
        return Ok(false);
    }

    let oldest = backup_path(log_path, BACKUP_COUNT);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..BACKUP_COUNT).rev() {
        let from = backup_path(log_path, n);
        if from.exists() {
            fs::rename(&from, backup_path(log_path, n + 1))?;
        }
    }
    fs::rename(log_path, backup_path(log_path, 1))
        .with_context(|| format!("Could not rotate {}", log_path.display()))?;

    Ok(true)
}
