use crate::types::ClockTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// labcheck - Is the lab free?
#[derive(Parser, Debug)]
#[command(name = "labcheck")]
#[command(about = "Check whether a lab room is free at a given day and time")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Schedule database (overrides the configuration file)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive wizard (default)
    Run {
        /// Where to write the log while the TUI owns the terminal
        #[arg(long, default_value = "labcheck.log")]
        log_file: PathBuf,
    },
    /// Check one room without the TUI
    Check {
        /// Day label exactly as in the schedule (e.g. Senin)
        #[arg(short, long)]
        day: String,
        /// Room label exactly as in the schedule (e.g. "Software I")
        #[arg(short, long)]
        room: String,
        /// Time as HH:MM (defaults to the configured default time)
        #[arg(short, long)]
        time: Option<ClockTime>,
        /// Print the wizard snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the days and rooms offered by the wizard
    Options {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import the schedule spreadsheet into the database
    Import {
        /// Workbook (.xls, .xlsx, .ods) or JSON array of rows with the columns
        /// hari, ruang, jam_mulai, jam_selesai, nama_matakuliah
        input: PathBuf,
    },
    /// Validate a configuration file
    ValidateConfig {
        /// Path to configuration file to validate
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_tui() {
        let cli = Cli::try_parse_from(["labcheck"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::try_parse_from([
            "labcheck",
            "--database",
            "/tmp/jadwal.db",
            "check",
            "--day",
            "Senin",
            "--room",
            "Software I",
            "--time",
            "08:30",
        ])
        .expect("parse");

        assert_eq!(cli.database, Some(PathBuf::from("/tmp/jadwal.db")));
        match cli.command {
            Some(Commands::Check {
                day, room, time, json,
            }) => {
                assert_eq!(day, "Senin");
                assert_eq!(room, "Software I");
                assert_eq!(time.map(|t| t.to_string()), Some("08:30".to_string()));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let result = Cli::try_parse_from([
            "labcheck", "check", "--day", "Senin", "--room", "A", "--time", "25:99",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
