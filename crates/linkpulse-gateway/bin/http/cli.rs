use clap::{Parser, ValueEnum};
use linkpulse_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LINKPULSE_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "LINKPULSE_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "LINKPULSE_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "LINKPULSE_MYSQL_DSN";
pub const ID_LENGTH_ENV: &str = "LINKPULSE_ID_LENGTH";
pub const ID_ALPHABET_ENV: &str = "LINKPULSE_ID_ALPHABET";
pub const LOG_FORMAT_ENV: &str = "LINKPULSE_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "LINKPULSE_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkpulse-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin that short URLs are rendered against.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = ID_LENGTH_ENV, default_value_t = DEFAULT_ID_LENGTH)]
    pub id_length: usize,

    /// Characters short ids are drawn from. Defaults to base62.
    #[arg(long, env = ID_ALPHABET_ENV)]
    pub id_alphabet: Option<String>,

    /// `text` or `json`.
    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC collector endpoint; span export is off when unset.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
