pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "aluquote",
    about = "AluQuote operator CLI",
    long_about = "Operate AluQuote migrations, demo fixtures, config inspection, and offline cart pricing.",
    after_help = "Examples:\n  aluquote migrate\n  aluquote seed\n  aluquote price --cart cart.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo catalog fixtures into the configured database")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Price a cart file offline and print the cost summary as JSON")]
    Price {
        #[arg(long, help = "Path to a cart JSON file")]
        cart: PathBuf,
        #[arg(
            long,
            help = "Price against the built-in demo catalog instead of the database"
        )]
        demo: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Price { cart, demo } => commands::price::run(&cart, demo),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
