use adflow_client::cli::Cli;
use adflow_client::config::get_configuration;
use adflow_client::handlers;
use adflow_client::startup::{apply_overrides, build_client, session_expired};
use adflow_core::observability::init_tracing;
use clap::Parser;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let mut configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    apply_overrides(&mut configuration, &cli);

    if let Err(e) = init_tracing("adflow", &configuration.telemetry) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let client = build_client(&configuration)?;
    let mut events = client.subscribe();

    let result = handlers::dispatch(&client, cli.command).await;

    if session_expired(&mut events) {
        eprintln!("Your session has expired. Run `adflow login` to sign in again.");
    }

    let output = result?;
    output.write_to(&mut std::io::stdout().lock())?;
    Ok(())
}
