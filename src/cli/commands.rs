use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(
    name = "dedupload",
    version,
    about = "Deduplicate and upload a directory tree to an S3-compatible object store",
    after_help = "Files are keyed by the SHA-256 of their contents. Content already recorded \
                  in the local index is never uploaded again, whatever its name or location. \
                  Logs go to stderr (filter with RUST_LOG); results are printed as JSON on stdout."
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload every new file under `app.uploadPath`.
    ///
    /// Directories are walked recursively in name order. `.zip` archives are
    /// skipped. The run stops at the first read, upload, or index error.
    Upload {
        /// Hash and look up files but do not upload or write the index
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the stored record for a fingerprint
    Lookup {
        /// SHA-256 fingerprint (64 hex characters)
        fingerprint: String,
    },

    /// List every record in the index
    Records,

    /// Print the fingerprint of a local file (no config needed)
    Hash {
        /// File to hash
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_defaults_to_config_yml() {
        let cli = Cli::try_parse_from(["dedupload", "records"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yml"));
        assert!(!cli.verbose);
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dedupload", "upload", "--dry-run", "-c", "/etc/d.yml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/d.yml"));
        assert!(matches!(cli.command, Command::Upload { dry_run: true }));
    }
}
