use anyhow::Context;
use clap::Parser;
use scheduler::cli::{Cli, Commands};
use scheduler::cli_handlers::{self, Format};
use scheduler::config::{Config, EXAMPLE_CONFIG};
use scheduler::{Scheduler, SchedulerError};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(SchedulerError::ConfigMissing(path)) => {
            eprintln!("Error: '{}' file not found.", path.display());
            eprintln!();
            eprintln!("Please create it with content like:");
            eprintln!();
            eprintln!("{EXAMPLE_CONFIG}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };

    let scheduler = Scheduler::new(config);
    let format = if cli.json { Format::Json } else { Format::Text };

    let command = cli.command.unwrap_or(Commands::Menu);

    // `init` reports its own outcome; everything else prepares the schema
    // quietly and carries on if that fails
    if command != Commands::Init {
        if let Err(e) = scheduler.init() {
            eprintln!("Error initializing database: {e}");
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli_handlers::dispatch(&scheduler, command, format, &mut input, &mut out) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `RUST_LOG` when it is set and parses, otherwise `warn`
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
