//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling diagnostic log files
    pub dir: Option<String>,
    /// JSONL file receiving every oracle exchange
    pub conversation_log: Option<String>,
}
