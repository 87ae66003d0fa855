//! Party shell
//!
//! Drives an in-memory party directory from stdin or a script file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use parties_cli::{load_config, CliError, Shell};
use parties_core::PartySession;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parties")]
#[command(about = "Parties - group membership shell", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "parties.toml")]
    config: PathBuf,

    /// Override the party capacity
    #[arg(long, global = true)]
    capacity: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands interactively from stdin
    Shell,

    /// Run commands from a file, one per line
    Script {
        /// Script path
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli.config, cli.capacity)?;
    let mut shell = Shell::new(PartySession::start(config));

    match cli.command {
        Commands::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            for line in stdin.lock().lines() {
                let line = line?;
                if matches!(line.trim(), "quit" | "exit") {
                    break;
                }
                for output in shell.execute(&line) {
                    writeln!(stdout, "{output}")?;
                }
                stdout.flush()?;
            }
        }

        Commands::Script { path } => {
            let script = std::fs::read_to_string(&path)
                .map_err(|source| CliError::Script { path, source })?;
            for line in script.lines() {
                for output in shell.execute(line) {
                    println!("{output}");
                }
            }
        }
    }

    shell.finish();
    Ok(())
}
