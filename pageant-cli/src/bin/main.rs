use clap::Parser;
use pageant_cli::{Command, Runner};
use std::fmt::Debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the Pageantry API. Remembered after a successful login.
    #[arg(long)]
    endpoint: Option<String>,
    /// Debug print
    #[arg(short, long)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_filter =
        if args.debug { "pageant_api=debug,pageant_http=debug,pageant_cli=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Runner::new(args.endpoint, args.debug).await?.run(args.command).await
}
