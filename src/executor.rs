use crate::lookup::pipeline::{LookupPipeline, LookupResult};
use crate::model::PackageQuery;
use crate::traits::{Fetcher, LookupError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

/// Bounds how many lookups are in flight at once.
pub struct LookupExecutor {
    semaphore: Arc<Semaphore>,
}

impl LookupExecutor {
    /// `concurrency_limit` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(concurrency_limit: usize) -> Self {
        let permits = concurrency_limit.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    #[instrument(skip(self, pipeline), fields(package = %query.name))]
    pub async fn execute<F>(
        &self,
        pipeline: Arc<LookupPipeline<F>>,
        query: PackageQuery,
    ) -> Result<LookupResult, LookupError>
    where
        F: Fetcher + 'static,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| LookupError::Unavailable(format!("Semaphore error: {}", e)))?;

        info!("Starting lookup: {:?}", query.kind);
        let result = pipeline.execute(&query).await;
        info!("Finished lookup: {:?}", query.kind);
        result
    }

    /// Runs every query as its own task; outcomes come back in input order.
    #[instrument(skip_all, fields(queries = queries.len()))]
    pub async fn execute_all<F>(
        &self,
        pipeline: Arc<LookupPipeline<F>>,
        queries: Vec<PackageQuery>,
    ) -> Vec<Result<LookupResult, LookupError>>
    where
        F: Fetcher + 'static,
    {
        let handles: Vec<_> = queries
            .into_iter()
            .map(|query| {
                let semaphore = Arc::clone(&self.semaphore);
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| LookupError::Unavailable(format!("Semaphore error: {}", e)))?;
                    pipeline.execute(&query).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(LookupError::Unavailable(format!("Task join error: {}", e))),
            });
        }
        results
    }
}
