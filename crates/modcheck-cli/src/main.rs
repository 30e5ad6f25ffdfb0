//! modcheck CLI - golden-file regression harness for a tracker module player
//!
//! This binary freezes module fixtures into hex listings, rebuilds the
//! golden fingerprint set, and runs the program under test against it.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use modcheck_cli::{commands, logging};

/// modcheck - Bit-exact regression testing for rendered module output
#[derive(Parser)]
#[command(name = "modcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON file overriding the default path conventions
    #[arg(long, global = true)]
    config: Option<String>,

    /// Digest used for fingerprints (overrides the config file)
    #[arg(long, global = true, value_parser = ["md5", "blake3"])]
    hash_algorithm: Option<String>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a hex array listing next to every module file in a directory
    Encode {
        /// Directory containing module files
        #[arg(short, long)]
        dir: String,

        /// Only verify that existing listings are up to date (writes nothing)
        #[arg(long)]
        check: bool,

        /// Write a JSON batch report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Fingerprint every expected-output file in a directory
    Hash {
        /// Directory containing expected-output files
        #[arg(short, long)]
        dir: String,

        /// Directory to write fingerprints to (default: from config)
        #[arg(long)]
        hash_dir: Option<String>,

        /// Create the fingerprint directory if it does not exist
        #[arg(long)]
        create_hash_dir: bool,

        /// Write a JSON batch report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run the program under test on one input and compare its output fingerprint
    Run {
        /// Path to the program under test
        #[arg(short, long = "exec")]
        exec: String,

        /// Input module file passed to the program
        #[arg(short, long)]
        input: String,

        /// Expected fingerprint of the produced output (hex)
        #[arg(short, long)]
        checksum: String,

        /// Kill the program after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Capture the program's stdout/stderr instead of passing them through
        #[arg(long)]
        capture: bool,
    },

    /// Run every module in a directory against its reference fingerprint
    Check {
        /// Path to the program under test
        #[arg(short, long = "exec")]
        exec: String,

        /// Directory containing module files
        #[arg(short, long)]
        dir: String,

        /// Directory holding reference fingerprints (default: from config)
        #[arg(long)]
        hash_dir: Option<String>,

        /// Kill each program run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write a JSON batch report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match commands::load_config(cli.config.as_deref(), cli.hash_algorithm.as_deref())
    {
        Ok(config) => config,
        Err(e) => return report_error(e),
    };

    let result = match cli.command {
        Commands::Encode {
            dir,
            check,
            report,
            json,
        } => commands::encode::run(&config, &dir, check, report.as_deref(), json),
        Commands::Hash {
            dir,
            hash_dir,
            create_hash_dir,
            report,
            json,
        } => commands::hash::run(
            &config,
            &dir,
            hash_dir.as_deref(),
            create_hash_dir,
            report.as_deref(),
            json,
        ),
        Commands::Run {
            exec,
            input,
            checksum,
            timeout,
            capture,
        } => commands::run::run(&config, &exec, &input, &checksum, timeout, capture),
        Commands::Check {
            exec,
            dir,
            hash_dir,
            timeout,
            report,
            json,
        } => commands::check::run(
            &config,
            &exec,
            &dir,
            hash_dir.as_deref(),
            timeout,
            report.as_deref(),
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => report_error(e),
    }
}

fn report_error(e: anyhow::Error) -> ExitCode {
    eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
    ExitCode::from(commands::EXIT_HARNESS_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "modcheck",
            "run",
            "--exec",
            "render",
            "--input",
            "song.mod",
            "--checksum",
            "900150983cd24fb0d6963f7d28e17f72",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                exec,
                input,
                checksum,
                timeout,
                capture,
            } => {
                assert_eq!(exec, "render");
                assert_eq!(input, "song.mod");
                assert_eq!(checksum, "900150983cd24fb0d6963f7d28e17f72");
                assert!(timeout.is_none());
                assert!(!capture);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_parses_run_short_flags() {
        let cli = Cli::try_parse_from([
            "modcheck", "run", "-e", "render", "-i", "song.mod", "-c", "deadbeef",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                exec,
                input,
                checksum,
                ..
            } => {
                assert_eq!(exec, "render");
                assert_eq!(input, "song.mod");
                assert_eq!(checksum, "deadbeef");
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_run_requires_all_named_arguments() {
        let err = Cli::try_parse_from(["modcheck", "run", "--exec", "render", "--input", "a.mod"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--checksum"));

        let err = Cli::try_parse_from(["modcheck", "run", "--input", "a.mod", "--checksum", "ab"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--exec"));

        // No positional form.
        assert!(Cli::try_parse_from(["modcheck", "run", "render", "a.mod", "ab"]).is_err());
    }

    #[test]
    fn test_cli_parses_encode() {
        let cli = Cli::try_parse_from(["modcheck", "encode", "--dir", "mod"]).unwrap();
        match cli.command {
            Commands::Encode {
                dir,
                check,
                report,
                json,
            } => {
                assert_eq!(dir, "mod");
                assert!(!check);
                assert!(report.is_none());
                assert!(!json);
            }
            _ => panic!("expected encode command"),
        }
    }

    #[test]
    fn test_cli_parses_hash_with_globals() {
        let cli = Cli::try_parse_from([
            "modcheck",
            "hash",
            "--dir",
            "songs",
            "--hash-dir",
            "hash",
            "--create-hash-dir",
            "--hash-algorithm",
            "blake3",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.hash_algorithm.as_deref(), Some("blake3"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Hash {
                dir,
                hash_dir,
                create_hash_dir,
                ..
            } => {
                assert_eq!(dir, "songs");
                assert_eq!(hash_dir.as_deref(), Some("hash"));
                assert!(create_hash_dir);
            }
            _ => panic!("expected hash command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_algorithm() {
        assert!(Cli::try_parse_from([
            "modcheck",
            "hash",
            "--dir",
            "songs",
            "--hash-algorithm",
            "sha1",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from([
            "modcheck",
            "check",
            "--exec",
            "render",
            "--dir",
            "mod",
            "--timeout",
            "60",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                exec,
                dir,
                hash_dir,
                timeout,
                report,
                json,
            } => {
                assert_eq!(exec, "render");
                assert_eq!(dir, "mod");
                assert!(hash_dir.is_none());
                assert_eq!(timeout, Some(60));
                assert!(report.is_none());
                assert!(json);
            }
            _ => panic!("expected check command"),
        }
    }
}
