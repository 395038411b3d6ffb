use clap::Parser;
use greengrocer::engine::{ComputeEngine, ComputeHandle};
use greengrocer::logging;
use greengrocer::server::EngineServer;
use greengrocer::table::PriceTable;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to accept engine clients on
    #[arg(long, default_value = "127.0.0.1:7878")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init("info");

    let table = Arc::new(PriceTable::seeded());
    println!("{}", table.render().await);

    let engine: ComputeHandle = Arc::new(ComputeEngine::new(table));
    let server = EngineServer::bind(cli.listen, engine)
        .await
        .into_diagnostic()?;

    tokio::select! {
        result = server.run() => result.into_diagnostic()?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    Ok(())
}
