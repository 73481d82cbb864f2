// Inherit lint configuration from lib.rs for consistency
#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use std::path::Path;

use clap::Parser;
use serde::Serialize;

use dedupload::cli::commands::{Cli, Command};
use dedupload::cli::output;
use dedupload::config::Config;
use dedupload::db::Index;
use dedupload::error::DedupError;
use dedupload::ingest::hasher;
use dedupload::models::FileRecord;
use dedupload::uploader;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries JSON results.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Command::Upload { dry_run } => cmd_upload(&cli.config, dry_run),
        Command::Lookup { fingerprint } => cmd_lookup(&cli.config, &fingerprint),
        Command::Records => cmd_records(&cli.config),
        Command::Hash { path } => cmd_hash(&path),
    }
}

type CmdResult = Result<(), DedupError>;

fn get_config(path: &Path) -> Result<Config, DedupError> {
    Config::load(path)
}

fn cmd_upload(config_path: &Path, dry_run: bool) -> CmdResult {
    let config = get_config(config_path)?;
    let summary = uploader::run_upload(&config, dry_run)?;
    println!("{}", output::format_json(&summary));
    Ok(())
}

fn cmd_lookup(config_path: &Path, fingerprint: &str) -> CmdResult {
    let fingerprint = hasher::parse_fingerprint(fingerprint)?;
    let config = get_config(config_path)?;
    let index = Index::open(&config.app.db_path)?;
    let record = index
        .lookup(&fingerprint)?
        .ok_or(DedupError::RecordNotFound { fingerprint })?;

    #[derive(Serialize)]
    struct LookupOutput {
        key: String,
        #[serde(flatten)]
        record: FileRecord,
    }
    println!(
        "{}",
        output::format_json(&LookupOutput {
            key: record.object_key(),
            record,
        })
    );
    index.close()
}

fn cmd_records(config_path: &Path) -> CmdResult {
    let config = get_config(config_path)?;
    let index = Index::open(&config.app.db_path)?;
    let records = index.all_records()?;

    #[derive(Serialize)]
    struct RecordsOutput {
        count: usize,
        records: Vec<FileRecord>,
    }
    println!(
        "{}",
        output::format_json(&RecordsOutput {
            count: records.len(),
            records,
        })
    );
    index.close()
}

fn cmd_hash(path: &Path) -> CmdResult {
    let fingerprint = hasher::hash_file(path)?;

    #[derive(Serialize)]
    struct HashOutput<'a> {
        path: &'a Path,
        sha: String,
    }
    println!(
        "{}",
        output::format_json(&HashOutput {
            path,
            sha: fingerprint,
        })
    );
    Ok(())
}
