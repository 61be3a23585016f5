//! Pushover CLI
//!
//! 通过 pushover.net 发送推送通知、查询 API 限额、管理本地凭据

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use pushover_cli::cli::{handle_config, handle_limits, handle_push, ConfigCommands, LimitsArgs, PushArgs};
use pushover_cli::ConfigStore;

#[derive(Parser)]
#[command(name = "pushover")]
#[command(about = "Fast and static CLI tool to send push notifications over pushover.net")]
#[command(version)]
struct Cli {
    /// Print debug information
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the given text message
    Push(PushArgs),
    /// Print the current API limits
    Limits(LimitsArgs),
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pushover_cli={level},pushover={level}",
            level = default_level
        ))
    });

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = ConfigStore::new();

    let result = match cli.command {
        Commands::Push(args) => handle_push(args, &store),
        Commands::Limits(args) => handle_limits(args, &store),
        Commands::Config { command } => handle_config(command, &store),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
