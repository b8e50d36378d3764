// src/utils/log.rs

//! Console reporter for the CLI.
//!
//! Lines carry a local timestamp and a level tag and honour the level given
//! to [`init`]. Library code logs through the `log` facade instead.

use std::sync::OnceLock;

use ::log::Level;
use chrono::Local;

static THRESHOLD: OnceLock<Level> = OnceLock::new();

/// Set the most verbose level to print. Unknown names fall back to `info`.
/// Only the first call has an effect.
pub fn init(level: &str) {
    let _ = THRESHOLD.set(parse_level(level));
}

fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::Info)
}

fn enabled(level: Level) -> bool {
    level <= THRESHOLD.get().copied().unwrap_or(Level::Info)
}

fn line(level: Level, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level.as_str(),
        message
    )
}

/// Print at `level`; warnings and errors go to stderr.
fn emit(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    match level {
        Level::Error | Level::Warn => eprintln!("{}", line(level, message)),
        _ => println!("{}", line(level, message)),
    }
}

pub fn info(message: &str) {
    emit(Level::Info, message);
}

pub fn warn(message: &str) {
    emit(Level::Warn, message);
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}

/// Completed step. Printed at every level.
pub fn success(message: &str) {
    println!("{}", line(Level::Info, &format!("✓ {message}")));
}

/// Boxed title for a command's output.
pub fn header(title: &str) {
    let rule = "═".repeat(60);
    let title = format!("  {title}");
    for text in [&rule, &title, &rule] {
        emit(Level::Info, text);
    }
}

/// Indented detail line under a header.
pub fn sub_item(message: &str) {
    emit(Level::Info, &format!("    {message}"));
}

/// Key/value block closing a command's output.
pub fn summary<K: AsRef<str>>(title: &str, rows: &[(K, String)]) {
    if !enabled(Level::Info) {
        return;
    }
    println!();
    emit(Level::Info, &format!("[SUMMARY] {title}"));
    for (key, value) in rows {
        emit(Level::Info, &format!("    {}: {}", key.as_ref(), value));
    }
}
