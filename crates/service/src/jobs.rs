//! Job board listing, read straight from its worksheet on every request.

use std::sync::Arc;
use std::time::Duration;

use aplus_core::{Row, RowSource, SourceError};

use crate::ServiceError;

/// Client-facing text when the job sheet cannot be read.
pub const JOBS_UNAVAILABLE: &str = "job listings are temporarily unavailable";

pub struct JobBoardService {
    source: Arc<dyn RowSource>,
    source_timeout: Duration,
}

impl JobBoardService {
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>, source_timeout: Duration) -> Self {
        Self { source, source_timeout }
    }

    /// Every non-blank job row keyed by header, in sheet order.
    pub async fn list_jobs(&self) -> Result<Vec<Row>, ServiceError> {
        let fetched = tokio::time::timeout(self.source_timeout, self.source.fetch_all_rows())
            .await
            .unwrap_or(Err(SourceError::Timeout(self.source_timeout)));
        match fetched {
            Ok(rows) => {
                let jobs: Vec<Row> = rows
                    .into_iter()
                    .filter(|row| row.values().any(|value| !value.trim().is_empty()))
                    .collect();
                tracing::debug!(jobs = jobs.len(), "fetched job listings");
                Ok(jobs)
            },
            Err(e) => {
                tracing::warn!(error = %e, transient = e.is_transient(), "job sheet unavailable");
                Err(ServiceError::ServiceUnavailable(JOBS_UNAVAILABLE.to_owned()))
            },
        }
    }
}
