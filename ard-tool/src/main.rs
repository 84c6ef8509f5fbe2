use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

use commands::archive::{CreateArgs, ExtractArgs};
use commands::container::ContainerCommands;

#[derive(Parser)]
#[command(
    name = "ard-tool",
    about = "XBC1 container codec and ARD/ARH archive tool",
    version,
    author,
    long_about = "A command-line tool for the XBC1 compressed container format and the \
                  ARD/ARH split archive format: compress and decompress standalone \
                  containers, extract existing archives, and build new ones."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compress or decompress standalone XBC1 containers
    #[command(subcommand)]
    Xbc1(ContainerCommands),

    /// Extract an ARD/ARH archive pair into a directory
    Extract(ExtractArgs),

    /// Create an ARD/ARH archive pair from a directory of files
    Create(CreateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    // Handle commands
    match cli.command {
        Commands::Xbc1(cmd) => commands::container::handle(cmd)?,
        Commands::Extract(args) => commands::archive::handle_extract(args)?,
        Commands::Create(args) => commands::archive::handle_create(args)?,
    }

    Ok(())
}
