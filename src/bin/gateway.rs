use clap::Parser;
use greengrocer::client::EngineClient;
use greengrocer::engine::ComputeHandle;
use greengrocer::gateway;
use greengrocer::logging;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to serve HTTP on
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Engine address to forward tasks to
    #[arg(long, default_value = "127.0.0.1:7878")]
    engine: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init("info");

    let engine: ComputeHandle =
        Arc::new(EngineClient::connect(&cli.engine).await.into_diagnostic()?);
    let app = gateway::router(engine);

    let listener = TcpListener::bind(cli.listen).await.into_diagnostic()?;
    info!(addr = %cli.listen, engine = %cli.engine, "gateway listening");
    axum::serve(listener, app).await.into_diagnostic()?;

    Ok(())
}
