mod config;
mod error;
mod http;

use clap::Parser;
use config::{Cli, Commands};

mod cmd;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve(args) => cmd::serve::run(args).await,
        Commands::Record(args) => cmd::record::run(args).await,
        Commands::Load(args) => cmd::inspect::load(args).await,
        Commands::History(args) => cmd::inspect::history(args).await,
        Commands::Sweep(args) => cmd::inspect::sweep(args).await,
        Commands::List(args) => cmd::inspect::list(args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
