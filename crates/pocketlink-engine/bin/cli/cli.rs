use clap::{Parser, Subcommand, ValueEnum};
use pocketlink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "POCKETLINK_DATA_DIR";
pub const STORAGE_BACKEND_ENV: &str = "POCKETLINK_STORAGE_BACKEND";
pub const BASE_URL_ENV: &str = "POCKETLINK_BASE_URL";
pub const GENERATOR_ENV: &str = "POCKETLINK_GENERATOR";
pub const GENERATOR_PREFIX_ENV: &str = "POCKETLINK_GENERATOR_PREFIX";
pub const LOG_FORMAT_ENV: &str = "POCKETLINK_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "POCKETLINK_LOG_LEVEL";

pub const DEFAULT_DATA_DIR: &str = ".pocketlink";
pub const DEFAULT_GENERATOR_PREFIX: &str = "pl";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Upper bound on URLs accepted by one `shorten` invocation.
pub const MAX_BATCH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "file")]
    File,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    #[value(name = "random")]
    Random,
    #[value(name = "seq")]
    Seq,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Seq => write!(f, "seq"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pocketlink", about = "Shorten URLs and track their clicks locally")]
pub struct CLI {
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    #[arg(long, global = true, env = BASE_URL_ENV, default_value = pocketlink_engine::settings::DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = GENERATOR_ENV,
        value_enum,
        default_value_t = GeneratorArg::Random
    )]
    pub generator: GeneratorArg,

    #[arg(
        long,
        global = true,
        env = GENERATOR_PREFIX_ENV,
        default_value = DEFAULT_GENERATOR_PREFIX,
    )]
    pub generator_prefix: String,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[arg(long, global = true, env = LOG_LEVEL_ENV, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Print the captured log entries after the command finishes.
    #[arg(long, global = true)]
    pub show_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create short URLs.
    Shorten {
        #[arg(required = true, num_args = 1..=MAX_BATCH)]
        urls: Vec<String>,
        /// Validity in minutes, 30 when omitted.
        #[arg(long)]
        minutes: Option<String>,
        /// Custom shortcode; only allowed with a single URL.
        #[arg(long)]
        code: Option<String>,
    },
    /// List every stored short URL.
    List,
    /// Show totals and click history.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Resolve a short code and record the click.
    Open {
        code: String,
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
        #[arg(long, default_value = "pocketlink-cli")]
        user_agent: String,
    },
    /// Delete expired short URLs.
    Purge,
    /// Delete expired short URLs periodically until interrupted.
    Sweep {
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}
