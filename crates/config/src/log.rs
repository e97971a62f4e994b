//! `[log]` section
//!
//! `jaffle` writes its log lines to stdout. This section only picks the
//! filter level and whether lines are human-readable or JSON.

use serde::Deserialize;

/// Minimum level of emitted log lines
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive for an `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Shape of each stdout log line
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `LEVEL target: message fields`
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// ```toml
/// [log]
/// level = "info"       # trace|debug|info|warn|error
/// format = "console"   # console|json
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}
