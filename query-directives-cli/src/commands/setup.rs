use anyhow::{Context, Result};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use std::env;
use std::io;
use std::path::Path;

use crate::Cli;

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Print shell completions to stdout
    Completions {
        /// Shell to generate completions for (auto-detected if not specified)
        #[arg(short, long, value_name = "SHELL")]
        shell: Option<Shell>,
    },
}

pub fn execute(command: SetupCommands) -> Result<()> {
    match command {
        SetupCommands::Completions { shell } => {
            let shell = match shell {
                Some(s) => s,
                None => detect_shell()?,
            };
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "qd", &mut io::stdout());
            Ok(())
        }
    }
}

/// Detect the user's current shell from $SHELL
fn detect_shell() -> Result<Shell> {
    let shell_path = env::var("SHELL")
        .context("Failed to detect shell. $SHELL not set. Use --shell to specify explicitly.")?;
    shell_from_path(&shell_path)
}

fn shell_from_path(shell_path: &str) -> Result<Shell> {
    let shell_name = Path::new(shell_path)
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid shell path")?;

    match shell_name {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "pwsh" | "powershell" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => anyhow::bail!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish, powershell, elvish.\nUse --shell to specify explicitly.",
            other
        ),
    }
}
