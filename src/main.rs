use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mazestep::{
    Maze,
    app::{App, AppConfig},
};

#[derive(Parser, Debug)]
#[command(name = "mazestep")]
#[command(about = "Watch a perfect maze being carved and solved, one step at a time")]
struct Args {
    /// Maze size (rows and columns, between 5 and 50). Asked interactively if omitted
    #[arg(long)]
    size: Option<usize>,

    /// Initial animation speed, 1 (slow) to 10 (fast)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
    speed: u8,

    /// Random seed for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,

    /// Directory to write the log file to (defaults to the system temp directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Log to a file, since the terminal belongs to the UI.
/// The returned guard flushes pending logs when dropped.
fn init_logging(log_dir: PathBuf) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, "mazestep.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

/// Reject an out-of-range `--size` before touching the terminal.
fn validate_size(size: Option<usize>) -> std::io::Result<()> {
    match size.map(Maze::square) {
        Some(Err(e)) => Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
        _ => Ok(()),
    }
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    validate_size(args.size)?;

    let _guard = init_logging(args.log_dir.clone().unwrap_or_else(std::env::temp_dir));
    tracing::info!("Starting mazestep with {:?}", args);

    let config = AppConfig {
        size: args.size,
        speed: args.speed,
        seed: args.seed,
        ..Default::default()
    };

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}
