//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for collectors.
    Json,
    /// Multi-line human readable output.
    #[default]
    Pretty,
}

/// Log level and format for the server binary.
///
/// `RUST_LOG` takes precedence over `level` when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level applied to every target.
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Extra `target=level` directives, e.g. `sqlx=warn`.
    #[serde(default = "default_directives")]
    pub directives: Vec<String>,
}

impl LoggingConfig {
    /// Filter string combining the base level and directives.
    pub fn filter(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            directives: default_directives(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_directives() -> Vec<String> {
    vec!["sqlx=warn".to_string(), "tower_http=info".to_string()]
}
