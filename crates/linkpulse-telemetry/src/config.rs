use std::fmt::{Display, Formatter};
use std::str::FromStr;
use typed_builder::TypedBuilder;

use crate::TelemetryError;

/// Output encoding of log lines written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::Config(format!("unknown log format: {other}"))),
        }
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    #[builder(setter(into))]
    pub service_name: String,
    #[builder(default)]
    pub log_format: LogFormat,
    /// gRPC endpoint of an OTLP collector, e.g. `http://localhost:4317`.
    /// Span export is disabled when unset.
    #[builder(default)]
    pub otlp_endpoint: Option<String>,
    /// Filter used when `RUST_LOG` is not set.
    #[builder(default = String::from("info"), setter(into))]
    pub default_directive: String,
}
