//! Tag-based logging for spamscreener
//!
//! Small, ergonomic logging API:
//! - Standard levels (Error/Warning/Info/Debug)
//! - Per-subsystem tags so output stays scannable
//! - Colored console output with address shortening
//!
//! Call `logger::init(debug)` once at startup; `debug` controls whether
//! `logger::debug(..)` lines are shown at all.

use chrono::Utc;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Subsystem tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Fetch,
    Parse,
    Cache,
    Refresh,
    Query,
}

impl LogTag {
    fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Fetch => "FETCH",
            LogTag::Parse => "PARSE",
            LogTag::Cache => "CACHE",
            LogTag::Refresh => "REFRESH",
            LogTag::Query => "QUERY",
        }
    }
}

/// Initialize the logger. Must be called once at startup.
pub fn init(debug: bool) {
    DEBUG_ENABLED.store(debug, Ordering::SeqCst);
}

pub fn error(tag: LogTag, message: &str) {
    emit(tag, "ERROR", message);
}

pub fn warning(tag: LogTag, message: &str) {
    emit(tag, "WARN", message);
}

pub fn info(tag: LogTag, message: &str) {
    emit(tag, "INFO", message);
}

/// Only shown when debug mode was enabled at init
pub fn debug(tag: LogTag, message: &str) {
    if DEBUG_ENABLED.load(Ordering::SeqCst) {
        emit(tag, "DEBUG", message);
    }
}

fn emit(tag: LogTag, level: &str, message: &str) {
    let timestamp = Utc::now().format("%H:%M:%S").to_string();
    let level_colored = match level {
        "ERROR" => level.red().bold(),
        "WARN" => level.yellow().bold(),
        "DEBUG" => level.purple().bold(),
        _ => level.green().bold(),
    };
    println!(
        "{} {} {} {}",
        format!("[{}]", timestamp).dimmed(),
        tag.label().cyan().bold(),
        level_colored,
        format_message(message)
    );
}

// Shorten hex contract addresses so log lines stay readable
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(0x[0-9a-fA-F]{24,})").expect("valid address regex"));

fn format_message(message: &str) -> String {
    ADDRESS_RE
        .replace_all(message, |caps: &regex::Captures| {
            let addr = &caps[1];
            format!("{}...{}", &addr[..10], &addr[addr.len() - 4..])
        })
        .to_string()
}
