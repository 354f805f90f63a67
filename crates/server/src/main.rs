use clap::Parser;
use tracing::info;

use alertgen_server::cli::Cli;
use alertgen_server::{build_router, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    alertgen_core::config::load_dotenv();
    let mut config = alertgen_core::Config::from_env();
    cli.apply(&mut config);
    config.log_summary();

    let state = startup::build_app_state(&config).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
