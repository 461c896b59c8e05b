//! Modgate command-line driver
//!
//! Loads a program description file, runs the module visibility checker and
//! reports diagnostics.

mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use commands::check::Format;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "modgate")]
#[command(about = "Module-scoped visibility checker", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a program for visibility errors
    Check {
        /// Program description file
        program: PathBuf,
        /// Checker configuration (defaults to modgate.toml beside the program)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Color output: auto, always, never
        #[arg(long)]
        color: Option<String>,
    },

    /// List declared modules and the module of each unit
    Modules {
        /// Program description file
        program: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            program,
            config,
            format,
            color,
        } => match commands::check::execute(&program, config.as_deref(), format, color.as_deref()) {
            Ok(0) => {}
            Ok(_) => std::process::exit(1),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(2);
            }
        },

        Commands::Modules { program } => {
            if let Err(e) = commands::modules::execute(&program) {
                eprintln!("Error: {:#}", e);
                std::process::exit(2);
            }
        }
    }
}
