use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod parsing;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Operator diagnostics (record counts, threshold) go to stderr at info
    let filter = if cli.verbose {
        EnvFilter::new("hash_match=debug,info")
    } else {
        EnvFilter::new("hash_match=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Match(args) => {
            cli::match_hashes::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Distance(args) => {
            cli::distance::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
