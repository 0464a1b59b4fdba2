mod aggregator;
mod cli;
mod error;
mod export;
mod fmt;
mod loader;
mod models;
mod normalizer;
mod profile;
mod renderer;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Preview { input, wide } => cli::preview::run(&input, wide),
        Commands::Export {
            input,
            format,
            output_dir,
            name,
        } => cli::export::run(&input, format, output_dir, name),
        Commands::Profiles => {
            cli::profiles::run();
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Init { force } => cli::config::init(force),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
