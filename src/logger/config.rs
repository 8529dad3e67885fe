//! Logger configuration and per-tag debug switches

use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Lines above this level are dropped
    pub min_level: LogLevel,
    /// Tags allowed to emit Debug lines
    pub debug_tags: HashSet<String>,
    /// Tags allowed to emit Verbose lines without global verbose mode
    pub verbose_tags: HashSet<String>,
    /// When non-empty, only these tags are printed
    pub enabled_tags: HashSet<String>,
    /// Disable console output entirely (tests)
    pub console_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            console_enabled: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn update_logger_config<F>(f: F)
where
    F: FnOnce(&mut LoggerConfig),
{
    let mut guard = LOGGER_CONFIG.write();
    f(&mut guard);
}

/// Scan command-line arguments for logging flags
///
/// Recognised flags:
/// - `--debug-<tag>` enables Debug lines for that tag (`--debug-all` for every tag)
/// - `--verbose` / `--verbose-<tag>`
/// - `--quiet` drops everything below Warning
pub fn init_from_args() {
    let args: Vec<String> = std::env::args().collect();
    apply_args(&args);
}

pub(crate) fn apply_args(args: &[String]) {
    update_logger_config(|cfg| {
        for arg in args {
            if arg == "--verbose" {
                cfg.min_level = LogLevel::Verbose;
            } else if arg == "--quiet" {
                cfg.min_level = LogLevel::Warning;
            } else if let Some(tag) = arg.strip_prefix("--debug-") {
                cfg.debug_tags.insert(tag.to_lowercase());
                if cfg.min_level < LogLevel::Debug {
                    cfg.min_level = LogLevel::Debug;
                }
            } else if let Some(tag) = arg.strip_prefix("--verbose-") {
                cfg.verbose_tags.insert(tag.to_lowercase());
                cfg.debug_tags.insert(tag.to_lowercase());
                if cfg.min_level < LogLevel::Debug {
                    cfg.min_level = LogLevel::Debug;
                }
            }
        }
    });
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = LOGGER_CONFIG.read();
    config.debug_tags.contains("all") || config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG
        .read()
        .verbose_tags
        .contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flags_are_parsed_per_tag() {
        let args = vec![
            "tool".to_string(),
            "--debug-prices".to_string(),
            "--verbose-rpc".to_string(),
        ];
        apply_args(&args);

        assert!(is_debug_enabled_for_tag(&LogTag::Prices));
        assert!(is_debug_enabled_for_tag(&LogTag::Rpc));
        assert!(is_verbose_enabled_for_tag(&LogTag::Rpc));
        assert!(!is_verbose_enabled_for_tag(&LogTag::Prices));
    }
}
