//! examupdt - command-line client for the Examupdt service.

mod cli;
mod client;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, browse, contact, list, records, stats};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        output::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let service_url = cli.service_url;
    match cli.command {
        Commands::Login(args) => auth::login(&service_url, args).await,
        Commands::Logout => auth::logout(&service_url).await,
        Commands::Whoami => auth::whoami(&service_url).await,
        Commands::Browse(args) => browse::run(&service_url, args).await,
        Commands::List(args) => list::run(&service_url, args).await,
        Commands::Show(args) => records::show(&service_url, args).await,
        Commands::Create(args) => records::create(&service_url, args).await,
        Commands::Update(args) => records::update(&service_url, args).await,
        Commands::Delete(args) => records::delete(&service_url, args).await,
        Commands::BulkDelete(args) => records::bulk_delete(&service_url, args).await,
        Commands::Contact(cmd) => contact::handle(&service_url, cmd).await,
        Commands::Stats => stats::run(&service_url).await,
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
