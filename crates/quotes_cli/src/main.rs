//! Smoke executable for the quotes store.
//!
//! # Responsibility
//! - Wire configuration, logging, connection bootstrap and schema sync.
//! - Run one store operation and print its result as JSON.

mod config;

use clap::Parser;
use config::{Command, Config, FlatConfig};
use log::error;
use quotes_core::{
    connect_with_policy, init_logging, NewQuote, QuoteService, SqliteQuoteRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::from(FlatConfig::parse());

    if let Some(dir) = config.log.dir.as_deref() {
        if let Err(err) = init_logging(&config.log.level, dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<String, Box<dyn std::error::Error>> {
    let conn = connect_with_policy(&config.db.dsn, &config.db.connect)?;
    let repo = SqliteQuoteRepository::try_new(conn)?;
    let service = QuoteService::new(repo);

    let output = match config.command {
        Command::Add { text, author, tags } => {
            let id = service.add_quote_with_tags(NewQuote::new(text, author), tags)?;
            serde_json::json!({ "id": id })
        }
        Command::All => serde_json::to_value(service.get_all()?)?,
        Command::ByAuthor { author } => serde_json::to_value(service.get_by_author(&author)?)?,
        Command::ByTag { tag } => serde_json::to_value(service.get_by_tag(&tag)?)?,
        Command::Tags => serde_json::to_value(service.get_all_tag_names()?)?,
        Command::IsEmpty => serde_json::json!({ "empty": service.is_empty()? }),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
