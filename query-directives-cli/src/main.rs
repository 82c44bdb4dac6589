use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use commands::check::CheckArgs;
use commands::setup::SetupCommands;

/// qd - check filter, sort and pagination directives against endpoint policies
#[derive(Parser)]
#[command(name = "qd")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string the way an endpoint would
    Check(CheckArgs),
    /// List the filter rules and their tokens
    Rules {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Setup and configuration commands
    Setup {
        #[command(subcommand)]
        command: SetupCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Rules { json } => commands::rules::execute(json).map(|()| true),
        Commands::Setup { command } => commands::setup::execute(command).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        // Rejections have already been reported by the command
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            ExitCode::FAILURE
        }
    }
}
