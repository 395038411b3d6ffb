use std::net::SocketAddr;

use tokio::io::{BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::engine::ComputeHandle;
use crate::error::{MarketError, Result};
use crate::task::Task;
use crate::wire::{self, Response};

/// TCP front of the compute engine.
///
/// Each connection is a little session: the client sends one task per line
/// and gets one response per line back, in order. A malformed line earns a
/// [`Response::Error`] but does not end the session.
pub struct EngineServer {
    listener: TcpListener,
    engine: ComputeHandle,
}

impl EngineServer {
    pub async fn bind(addr: SocketAddr, engine: ComputeHandle) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, engine })
    }

    /// The address actually bound, useful when listening on port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one spawned session per client.
    pub async fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "engine listening");
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let engine = self.engine.clone();
            tokio::spawn(async move {
                info!(%peer, "client connected");
                match serve_connection(stream, engine).await {
                    Ok(()) => info!(%peer, "client disconnected"),
                    Err(error) => warn!(%peer, %error, "connection ended with error"),
                }
            });
        }
    }
}

async fn serve_connection(stream: TcpStream, engine: ComputeHandle) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(write_half);

    loop {
        let task: Task = match wire::read_frame(&mut reader).await {
            Ok(Some(task)) => task,
            Ok(None) => return Ok(()),
            Err(MarketError::CodecError(error)) => {
                warn!(%error, "dropping malformed frame");
                let response = Response::Error {
                    message: format!("malformed task: {error}"),
                };
                wire::write_frame(&mut writer, &response).await?;
                continue;
            }
            Err(error) => return Err(error),
        };

        let response = match engine.execute_task(task).await {
            Ok(outcome) => Response::Outcome(outcome),
            Err(error) => Response::Error {
                message: error.to_string(),
            },
        };
        wire::write_frame(&mut writer, &response).await?;
    }
}
