// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error};
use std::io::Write;
use std::process::ExitCode;

use nbsplit::app_config::{CONFIG_FILE_NAME, Config};
use nbsplit::app_controller::Controller;
use nbsplit::errors::AppError;

/// nbsplit - Generates student and teacher notebooks per language
///
/// Reads every notebook in the source directory and writes, for each
/// supported language, a student version without solution cells and a
/// teacher version without exercise cells.
#[derive(Parser, Debug)]
#[command(name = "nbsplit")]
#[command(version)]
#[command(about = "Generates material and solution notebooks per language")]
#[command(long_about = "Generates material and solution notebooks per language.

Cells tagged \"soln\" only go to the teacher notebooks (solution-<lang>/),
cells tagged \"exer\" only go to the student notebooks (<lang>/). Every
non-empty cell must list its languages in its \"lang\" metadata, e.g. \"en,fr\".

Derived notebooks are only rebuilt when they are older than their source,
unless --rebuild is given.

CONFIGURATION:
    An optional nbsplit.json in the working directory can override the source
    directory, output directory, languages, directory prefixes and log level.")]
struct CommandLineOptions {
    /// Force rebuilding notebooks
    #[arg(short, long)]
    rebuild: bool,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Info until the configuration says otherwise
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", anyhow::Error::new(e));
            ExitCode::FAILURE
        }
    }
}

fn run(options: CommandLineOptions) -> Result<(), AppError> {
    let config = Config::load_or_default(CONFIG_FILE_NAME)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    controller.run(options.rebuild)?;

    Ok(())
}
