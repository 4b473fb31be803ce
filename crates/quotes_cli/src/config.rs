//! CLI configuration, read from flags or environment.

use clap::{Parser, Subcommand};
use quotes_core::ConnectPolicy;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "quotes", version, about = "Query and seed the quotes store")]
pub struct FlatConfig {
    #[arg(long, env = "QUOTES_DSN", help = "SQLite path, `:memory:` or `file:` URI")]
    dsn: String,

    #[arg(long, env = "QUOTES_LOG_LEVEL", help = "trace|debug|info|warn|error")]
    log_level: Option<String>,

    #[arg(long, env = "QUOTES_LOG_DIR", help = "Absolute directory for rolling log files")]
    log_dir: Option<String>,

    #[arg(long, env = "QUOTES_CONNECT_ATTEMPTS", default_value_t = 11)]
    connect_attempts: u32,

    #[arg(long, env = "QUOTES_CONNECT_BACKOFF_MS", default_value_t = 2000)]
    connect_backoff_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store one quote with its tags.
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        author: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print every quote.
    All,
    /// Print quotes by exact author.
    ByAuthor { author: String },
    /// Print quotes carrying a tag.
    ByTag { tag: String },
    /// Print every tag name.
    Tags,
    /// Print whether the store holds no quotes.
    IsEmpty,
}

#[derive(Debug)]
pub struct Config {
    pub db: DbConfiguration,
    pub log: LogConfiguration,
    pub command: Command,
}

#[derive(Debug)]
pub struct DbConfiguration {
    pub dsn: String,
    pub connect: ConnectPolicy,
}

#[derive(Debug)]
pub struct LogConfiguration {
    pub level: String,
    /// Logging stays off when unset.
    pub dir: Option<String>,
}

impl From<FlatConfig> for Config {
    fn from(value: FlatConfig) -> Self {
        Config {
            db: DbConfiguration {
                dsn: value.dsn,
                connect: ConnectPolicy {
                    max_attempts: value.connect_attempts,
                    backoff: Duration::from_millis(value.connect_backoff_ms),
                },
            },
            log: LogConfiguration {
                level: value
                    .log_level
                    .unwrap_or_else(|| quotes_core::default_log_level().to_string()),
                dir: value.log_dir,
            },
            command: value.command,
        }
    }
}
