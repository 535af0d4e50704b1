//! labcheck - Main entry point
//!
//! Loads configuration, reads the day/room option lists once, then runs either
//! the interactive wizard or one of the headless commands.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::path::Path;
use std::sync::Arc;

use labcheck::app::App;
use labcheck::cli::{Cli, Commands};
use labcheck::{
    AppConfig, Choice, LabCheckError, SelectionOptions, SqliteStore, Verdict, WizardController,
};

/// Initialize the logger with appropriate settings.
///
/// When `log_file` is set the log goes there instead of stderr, so it does not
/// draw over the TUI.
fn init_logger(log_file: Option<&Path>) {
    use env_logger::{Builder, Target};
    use std::io::Write;

    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env(); // Allows RUST_LOG env var to override

    if let Some(path) = log_file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    builder.init();
}

/// Main application entry point
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    match &cli.command {
        None => init_logger(Some(Path::new("labcheck.log"))),
        Some(Commands::Run { log_file }) => init_logger(Some(log_file.as_path())),
        Some(_) => init_logger(None),
    }
    info!("labcheck starting up");
    debug!("CLI arguments parsed: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration failed: {:#}", e);
            eprintln!("✗ Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::ValidateConfig { file }) => {
            info!("Validating configuration file: {:?}", file);
            match AppConfig::load_from_file(&file).and_then(|c| c.validate().map(|_| c)) {
                Ok(config) => println!("✓ Configuration file is valid: {:?}", config),
                Err(e) => {
                    error!("Configuration validation failed: {:#}", e);
                    eprintln!("✗ Configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Import { input }) => {
            match labcheck::import::import_schedule(&input, &config.database) {
                Ok(report) => println!(
                    "✓ Imported {} of {} row(s) into {} ({} skipped)",
                    report.rows_imported,
                    report.rows_read,
                    config.database.display(),
                    report.rows_skipped
                ),
                Err(e) => exit_with(&e),
            }
        }
        Some(Commands::Options { json }) => {
            let controller = build_controller(&config).unwrap_or_else(|e| exit_with(&e));
            print_options(controller.options(), json)?;
        }
        Some(Commands::Check {
            day,
            room,
            time,
            json,
        }) => {
            let controller = build_controller(&config).unwrap_or_else(|e| exit_with(&e));
            match controller.check(Choice::from_label(&day), Choice::from_label(&room), time) {
                Ok(session) => print_verdict(&session, json)?,
                Err(e) => exit_with(&LabCheckError::from(e)),
            }
        }
        Some(Commands::Run { .. }) | None => {
            let controller = build_controller(&config).unwrap_or_else(|e| exit_with(&e));
            run_tui(App::new(controller, config.time_step_minutes))?;
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Open the store and load the option lists. Fails before any session starts.
fn build_controller(config: &AppConfig) -> Result<WizardController, LabCheckError> {
    let store = SqliteStore::new(&config.database, config.query_timeout());
    let options = SelectionOptions::load(&store)?;
    Ok(WizardController::new(Arc::new(store), options).with_default_time(config.default_time))
}

fn exit_with(err: &LabCheckError) -> ! {
    error!("{}", err);
    eprintln!("✗ {}", err);
    std::process::exit(1);
}

fn print_options(
    options: &SelectionOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }
    println!("Days:");
    for day in options.days() {
        println!("  {}", day);
    }
    println!("Rooms:");
    for room in options.rooms() {
        println!("  {}", room);
    }
    Ok(())
}

fn print_verdict(
    session: &labcheck::WizardSession,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        return Ok(());
    }

    let s = session.selections();
    match session.last_outcome() {
        Some(Verdict::Available) => {
            println!("✓ TERSEDIA: {} is free on {} at {}", s.room, s.day, s.time);
        }
        Some(Verdict::Occupied(record)) => {
            println!("✗ DIGUNAKAN: {} is in use on {} at {}", s.room, s.day, s.time);
            println!("  Course: {}", record.course_name);
            println!("  Time:   {} - {}", record.start_time, record.end_time);
        }
        None => exit_with(&LabCheckError::resolution("no verdict was produced")),
    }
    Ok(())
}

/// Run the interactive wizard
fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode()
        .map_err(|e| LabCheckError::terminal(format!("Failed to enable raw mode: {}", e)))?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen).map_err(|e| {
        LabCheckError::terminal(format!("Failed to enter alternate screen: {}", e))
    })?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| LabCheckError::terminal(format!("Failed to create terminal: {}", e)))?;

    let result = app.run(&mut terminal);

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    Ok(result?)
}
