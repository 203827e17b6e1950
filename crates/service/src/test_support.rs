//! In-memory row source and sink doubles shared by the service tests.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aplus_core::{Row, RowSink, RowSource, SourceError};
use async_trait::async_trait;

pub(crate) fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

pub(crate) fn verified_row(profile_id: &str, subject: &str, major: &str) -> Row {
    let name = format!("Tutor {profile_id}");
    row(&[
        ("Name", name.as_str()),
        ("Verified", "Yes"),
        ("Profile ID", profile_id),
        ("Subject", subject),
        ("Major Subjects", major),
    ])
}

pub(crate) struct StaticSource {
    rows: Mutex<Result<Vec<Row>, SourceError>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl StaticSource {
    pub(crate) fn new(rows: Vec<Row>) -> Arc<Self> {
        Arc::new(Self { rows: Mutex::new(Ok(rows)), calls: AtomicUsize::new(0), delay: Duration::ZERO })
    }

    pub(crate) fn failing(err: SourceError) -> Arc<Self> {
        Arc::new(Self { rows: Mutex::new(Err(err)), calls: AtomicUsize::new(0), delay: Duration::ZERO })
    }

    pub(crate) fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        let rows = self.rows.lock().unwrap().clone();
        Arc::new(Self { rows: Mutex::new(rows), calls: AtomicUsize::new(0), delay })
    }

    pub(crate) fn set_rows(&self, rows: Vec<Row>) {
        *self.rows.lock().unwrap() = Ok(rows);
    }

    pub(crate) fn fail_with(&self, err: SourceError) {
        *self.rows.lock().unwrap() = Err(err);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowSource for StaticSource {
    async fn fetch_all_rows(&self) -> Result<Vec<Row>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.rows.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    appended: Mutex<Vec<Row>>,
    failure: Mutex<Option<SourceError>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn fail_with(&self, err: SourceError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn appended(&self) -> Vec<Row> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowSink for RecordingSink {
    async fn append_row(&self, row: &Row) -> Result<(), SourceError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.appended.lock().unwrap().push(row.clone());
        Ok(())
    }
}
