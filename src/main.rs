use anyhow::Result;
use clap::Parser;
use desk_client::{DeskClient, cli::Cli, config};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // a) Logging (stderr, so stdout only carries JSON and status diagnostics)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // b) CLI
    let cli = Cli::parse();

    // c) Config and client
    let desk_config = config::resolve(&cli.config, cli.endpoint.as_deref(), cli.api_key.as_deref())?;
    info!("Using Desk installation {}", desk_config.endpoint);
    let client = DeskClient::new(desk_config)?;

    // d) Run
    let response = cli.command.run(&client)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
