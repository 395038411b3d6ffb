use async_trait::async_trait;
use tokio::io::BufStream;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;
use tracing::debug;

use crate::engine::Compute;
use crate::error::{MarketError, Result};
use crate::outcome::TaskOutcome;
use crate::task::Task;
use crate::wire::{self, Response};

/// Remote handle to an engine over TCP.
///
/// Implements [`Compute`], so callers use it exactly like the in-process
/// engine. The connection carries one task at a time; the internal lock
/// keeps each request paired with its response.
pub struct EngineClient {
    stream: Mutex<BufStream<TcpStream>>,
}

impl EngineClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream: Mutex::new(BufStream::new(stream)),
        })
    }
}

#[async_trait]
impl Compute for EngineClient {
    async fn execute_task(&self, task: Task) -> Result<TaskOutcome> {
        let mut stream = self.stream.lock().await;
        debug!(task = task.name(), "sending task");
        wire::write_frame(&mut *stream, &task).await?;
        match wire::read_frame::<_, Response>(&mut *stream).await? {
            Some(Response::Outcome(outcome)) => Ok(outcome),
            Some(Response::Error { message }) => Err(MarketError::RemoteError(message)),
            None => Err(MarketError::ConnectionClosed),
        }
    }
}
