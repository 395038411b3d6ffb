use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::outcome::TaskOutcome;
use crate::table::PriceTable;
use crate::task::Task;

/// Something that can run a [`Task`] and hand back its outcome.
///
/// The in-process [`ComputeEngine`] and the remote
/// [`EngineClient`](crate::client::EngineClient) both implement this, so
/// callers such as the HTTP gateway never care which side of the wire the
/// table lives on.
#[async_trait]
pub trait Compute: Send + Sync {
    async fn execute_task(&self, task: Task) -> Result<TaskOutcome>;
}

pub type ComputeHandle = Arc<dyn Compute>;

/// The engine that owns the shared price table.
pub struct ComputeEngine {
    table: Arc<PriceTable>,
}

impl ComputeEngine {
    pub fn new(table: Arc<PriceTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Compute for ComputeEngine {
    async fn execute_task(&self, task: Task) -> Result<TaskOutcome> {
        info!(task = task.name(), "received task");
        let outcome = task.execute(&self.table).await;
        info!(task = task.name(), "task completed");
        Ok(outcome)
    }
}
