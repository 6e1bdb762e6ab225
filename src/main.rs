mod aggregate;
mod cli;
mod dashboard;
mod error;
mod filter;
mod fmt;
mod loader;
mod models;
mod session;
mod settings;
mod stats;
mod table;

use clap::Parser;

use aggregate::ALL_AGGREGATES;
use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { data } => cli::init::run(&data),
        Commands::Info { data } => cli::info::run(data),
        Commands::Kinds => {
            for kind in ALL_AGGREGATES {
                println!("{:<12} {:<40} {}", kind.key(), kind.title(), kind.chart());
            }
            println!("{:<12} every summary above", "all");
            Ok(())
        }
        Commands::Report {
            kind,
            filter,
            format,
        } => cli::report::run(&kind, &filter, &format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
