use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use run::SimulateArgs;

mod inspect;
mod run;

#[derive(Parser)]
#[command(version, about = "Simulates and records a periodic stable-fluids wind field")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a wind scenario and records every frame.
    Simulate(SimulateArgs),
    /// Prints per-frame statistics of a recording.
    Inspect {
        /// Directory holding the recording.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Simulate(args) => run::simulate(args),
        Command::Inspect { path } => inspect::inspect(path),
    };

    if let Err(err) = result {
        log::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
