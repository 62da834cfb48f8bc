use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid telemetry config: {0}")]
    Config(String),
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to build span exporter: {0}")]
    Exporter(String),
    #[error("failed to install subscriber: {0}")]
    Install(String),
}
