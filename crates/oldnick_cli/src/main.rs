//! Command-line driver for the old-nicknames data fix.
//!
//! Imports GEDCOM into a SQLite record store, lists candidates, previews and
//! applies the nickname rewrite.

use clap::{Parser, Subcommand};
use log::info;
use oldnick_core::db::open_db;
use oldnick_core::{default_log_level, init_logging, DataFixService, SqliteRecordStore};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "oldnick")]
#[command(about = "Put quoted nicknames into GEDCOM display names", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite record store (created when missing)
    #[arg(long, env = "OLDNICK_DB")]
    db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "OLDNICK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "OLDNICK_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every INDI record of a GEDCOM file
    Import { file: PathBuf },

    /// List persons selected by the coarse scan
    Candidates,

    /// Show before/after NAME facts of confirmed fixes
    Preview {
        /// Only this person (xref without `@`)
        person: Option<String>,
    },

    /// Persist confirmed fixes
    Apply {
        /// Only this person (xref without `@`)
        person: Option<String>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir)?;
    }

    let mut conn = open_db(&cli.db)?;
    let store = SqliteRecordStore::try_new(&mut conn)?;
    let mut service = DataFixService::new(store);

    match cli.command {
        Command::Import { file } => {
            let document = std::fs::read_to_string(&file)?;
            let imported = service.import(&document)?;
            println!("imported {imported} persons from {}", file.display());
        }
        Command::Candidates => {
            for id in service.candidates()? {
                println!("{id}");
            }
        }
        Command::Preview { person: Some(id) } => match service.preview(&id)? {
            Some(preview) => println!("{}\n{}", preview.person_id, preview.diff),
            None => println!("{id}: nothing to fix"),
        },
        Command::Preview { person: None } => {
            for preview in service.previews()? {
                println!("{}\n{}\n", preview.person_id, preview.diff);
            }
        }
        Command::Apply { person: Some(id) } => {
            let names = service.fix_person(&id)?;
            println!("{id}: {names} names updated");
        }
        Command::Apply { person: None } => {
            let summary = service.apply()?;
            info!(
                "event=cli_apply module=cli status=ok persons_updated={}",
                summary.persons_updated
            );
            println!(
                "candidates={} persons_updated={} names_updated={}",
                summary.candidates, summary.persons_updated, summary.names_updated
            );
        }
    }

    Ok(())
}
