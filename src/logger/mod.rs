//! Structured, tag-based logging
//!
//! ```rust,ignore
//! use chainfolio::logger::{self, LogTag};
//!
//! logger::info(LogTag::Discovery, "Found 3 tokens");
//! logger::debug(LogTag::Rpc, "eth_call payload ..."); // Only with --debug-rpc
//! ```
//!
//! Call [`init`] once at startup. Library code never needs to: unconfigured
//! logging prints Info and above.

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from command-line arguments
pub fn init() {
    config::init_from_args();
}

/// Apply the `[logging]` section of the application config
pub fn apply_settings(settings: &crate::config::LoggingConfig) {
    update_logger_config(|cfg| {
        if let Some(level) = LogLevel::parse(&settings.level) {
            cfg.min_level = level;
        }
        for tag in &settings.debug_tags {
            cfg.debug_tags.insert(tag.to_lowercase());
        }
        if !settings.debug_tags.is_empty() && cfg.min_level < LogLevel::Debug {
            cfg.min_level = LogLevel::Debug;
        }
        cfg.console_enabled = settings.console;
    });
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when the tag is debug-enabled (`--debug-<tag>` or the
/// `logging.debug_tags` config list).
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
