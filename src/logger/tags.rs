/// Log tags identify the subsystem a line comes from.
///
/// Each tag has a stable debug key used by `--debug-<key>` flags and by
/// `LoggerConfig::debug_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Discovery,
    Indexer,
    Rpc,
    Prices,
    Cache,
    Portfolio,
    RateLimit,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used for per-tag debug switches
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Discovery => "discovery".to_string(),
            LogTag::Indexer => "indexer".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Prices => "prices".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Portfolio => "portfolio".to_string(),
            LogTag::RateLimit => "ratelimit".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label used in plain output
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Discovery => "DISCOVER".to_string(),
            LogTag::Indexer => "INDEXER".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Prices => "PRICE".to_string(),
            LogTag::Cache => "CACHE".to_string(),
            LogTag::Portfolio => "PORTFOLIO".to_string(),
            LogTag::RateLimit => "RATELIMIT".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}
