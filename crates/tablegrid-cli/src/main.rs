mod cli;
mod edges_cmd;
mod page_range;
mod shared;
mod tables_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Tables {
            ref file,
            ref pages,
            ref format,
            ref strategies,
            ref tolerances,
            keep_empty,
        } => {
            let settings = cli::build_settings(strategies, tolerances, keep_empty);
            tables_cmd::run(file, pages.as_deref(), format, settings)
        }
        Commands::Edges {
            ref file,
            ref pages,
            ref format,
            ref tolerances,
        } => {
            let settings = tolerances.apply(Default::default());
            edges_cmd::run(file, pages.as_deref(), format, &settings)
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
