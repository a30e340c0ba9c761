use clap::Parser;
use tracing_subscriber::EnvFilter;

use megan_remote::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("megan_remote=debug,info")
    } else {
        EnvFilter::new("megan_remote=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let session = &cli.session;
    match cli.command {
        cli::Commands::List => {
            cli::datasets::run_list(session, cli.format, cli.verbose)?;
        }
        cli::Commands::Info(args) => {
            cli::datasets::run_info(args, session, cli.format)?;
        }
        cli::Commands::Classification(args) => {
            cli::datasets::run_classification(args, session, cli.format, cli.verbose)?;
        }
        cli::Commands::Aux(args) => {
            cli::datasets::run_aux(args, session, cli.format)?;
        }
        cli::Commands::Reads(args) => {
            cli::reads::run_reads(args, session, cli.format, cli.verbose)?;
        }
        cli::Commands::Find(args) => {
            cli::reads::run_find(args, session, cli.format, cli.verbose)?;
        }
        cli::Commands::Hash(args) => {
            cli::hash::run(args, session, cli.verbose)?;
        }
    }

    Ok(())
}
