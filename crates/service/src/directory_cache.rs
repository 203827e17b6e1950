//! In-memory snapshot of verified tutors, rebuilt wholesale from the row source.
//!
//! Readers clone an `Arc<Snapshot>` and never see a half-built list. Refreshes
//! are serialized by `refresh_lock`; callers that queued behind an in-flight
//! refresh reuse its outcome instead of fetching again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aplus_core::{RowSource, SourceError, TutorRecord, normalize_rows};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::ServiceError;

/// One immutable generation of normalized, verified records.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Arc<[TutorRecord]>,
    refreshed_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self { records: Arc::from(Vec::new()), refreshed_at: None, generation: 0 }
    }

    /// Records in source row order.
    pub fn records(&self) -> &[TutorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Incremented on every published refresh; 0 means never populated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if empty, invalidated/never refreshed, or at least `ttl` old.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let Some(refreshed_at) = self.refreshed_at else {
            return true;
        };
        if self.records.is_empty() {
            return true;
        }
        // A refresh stamped in the future (clock step) counts as fresh.
        match now.signed_duration_since(refreshed_at).to_std() {
            Ok(age) => age >= ttl,
            Err(_) => false,
        }
    }

    pub fn get_by_id(&self, profile_id: &str) -> Option<&TutorRecord> {
        self.records.iter().find(|r| r.profile_id == profile_id)
    }

    fn invalidated(&self) -> Self {
        Self { records: Arc::clone(&self.records), refreshed_at: None, generation: self.generation }
    }
}

/// Counts from one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub total_rows: usize,
    pub accepted: usize,
    pub unverified: usize,
    pub rejected: usize,
    /// False when nothing was accepted and the previous snapshot was kept.
    pub published: bool,
    /// Generation current after this refresh.
    pub generation: u64,
}

/// What `refresh_if_stale` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot was fresh, nothing fetched.
    Fresh,
    /// This call fetched the source.
    Refreshed(RefreshReport),
    /// Another caller's refresh completed while this one waited.
    Joined,
}

#[derive(Debug, Default)]
struct RefreshState {
    last_failure: Option<SourceError>,
}

pub struct DirectoryCache {
    source: Arc<dyn RowSource>,
    source_timeout: Duration,
    snapshot: RwLock<Arc<Snapshot>>,
    refresh_lock: Mutex<RefreshState>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl DirectoryCache {
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>, source_timeout: Duration) -> Self {
        Self {
            source,
            source_timeout,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            refresh_lock: Mutex::new(RefreshState::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current snapshot. Never triggers a refresh.
    pub async fn get_all(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    pub async fn get_by_id(&self, profile_id: &str) -> Option<TutorRecord> {
        self.get_all().await.get_by_id(profile_id).cloned()
    }

    pub async fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.get_all().await.is_stale(now, ttl)
    }

    /// Keep the records but force the next staleness check to refresh.
    pub async fn invalidate(&self) {
        let mut guard = self.snapshot.write().await;
        *guard = Arc::new(guard.invalidated());
        tracing::info!(generation = guard.generation(), "directory cache invalidated");
    }

    /// Fetch the source now, waiting for any in-flight refresh first.
    pub async fn refresh(&self) -> Result<RefreshReport, ServiceError> {
        let mut state = self.refresh_lock.lock().await;
        self.refresh_locked(&mut state).await
    }

    /// Refresh only if stale, at most one fetch per wave of concurrent callers.
    ///
    /// A caller that waited on another caller's attempt gets that attempt's
    /// failure, or `Joined` if it succeeded.
    pub async fn refresh_if_stale(&self, ttl: Duration) -> Result<RefreshOutcome, ServiceError> {
        // Read before the staleness check so an attempt finishing in between is noticed.
        let seen = self.attempts.load(Ordering::SeqCst);
        if !self.is_stale(Utc::now(), ttl).await {
            tracing::debug!("directory cache hit");
            return Ok(RefreshOutcome::Fresh);
        }

        let mut state = self.refresh_lock.lock().await;
        if self.attempts.load(Ordering::SeqCst) != seen {
            return match &state.last_failure {
                Some(err) => Err(ServiceError::SourceUnavailable(err.clone())),
                None => Ok(RefreshOutcome::Joined),
            };
        }
        self.refresh_locked(&mut state).await.map(RefreshOutcome::Refreshed)
    }

    async fn refresh_locked(&self, state: &mut RefreshState) -> Result<RefreshReport, ServiceError> {
        let result = self.fetch_and_publish().await;
        state.last_failure = result.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Err(ref e) = result {
            tracing::warn!(
                error = %e,
                transient = e.is_transient(),
                "directory refresh failed, keeping previous snapshot"
            );
        }
        result.map_err(ServiceError::from)
    }

    async fn fetch_and_publish(&self) -> Result<RefreshReport, SourceError> {
        let rows = tokio::time::timeout(self.source_timeout, self.source.fetch_all_rows())
            .await
            .map_err(|_| SourceError::Timeout(self.source_timeout))??;

        let normalized = normalize_rows(&rows);
        for err in &normalized.rejected {
            tracing::warn!(error = %err, "skipping tutor row");
        }

        let accepted = normalized.records.len();
        let unverified = normalized.unverified;
        let rejected = normalized.rejected.len();

        let (published, generation) = if accepted > 0 {
            let mut guard = self.snapshot.write().await;
            let generation = guard.generation().saturating_add(1);
            *guard = Arc::new(Snapshot {
                records: Arc::from(normalized.records),
                refreshed_at: Some(Utc::now()),
                generation,
            });
            (true, generation)
        } else {
            tracing::warn!(
                total_rows = rows.len(),
                "no verified tutors in source, keeping previous snapshot"
            );
            (false, self.get_all().await.generation())
        };

        let report =
            RefreshReport { total_rows: rows.len(), accepted, unverified, rejected, published, generation };
        tracing::info!(
            total_rows = report.total_rows,
            accepted = report.accepted,
            unverified = report.unverified,
            rejected = report.rejected,
            generation = report.generation,
            "directory refreshed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StaticSource, row, verified_row};
    use chrono::TimeDelta;

    const TTL: Duration = Duration::from_secs(300);

    fn cache_with(source: &Arc<StaticSource>) -> DirectoryCache {
        DirectoryCache::new(Arc::clone(source) as Arc<dyn RowSource>, Duration::from_secs(5))
    }

    #[test]
    fn test_empty_snapshot_is_stale() {
        assert!(Snapshot::empty().is_stale(Utc::now(), TTL));
    }

    #[test]
    fn test_staleness_boundary_is_inclusive() {
        let now = Utc::now();
        let snapshot = Snapshot {
            records: Arc::from(vec![verified_record("A")]),
            refreshed_at: Some(now),
            generation: 1,
        };
        assert!(!snapshot.is_stale(now + TimeDelta::seconds(299), TTL));
        assert!(snapshot.is_stale(now + TimeDelta::seconds(300), TTL));
        assert!(!snapshot.is_stale(now - TimeDelta::seconds(10), TTL));
    }

    fn verified_record(id: &str) -> TutorRecord {
        aplus_core::normalize_row(&verified_row(id, "Math", ""), 2).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_publishes_only_verified_rows() {
        let source = StaticSource::new(vec![
            verified_row("T1", "Math", "Math, Physics"),
            row(&[("Name", "Unverified"), ("Verified", "No"), ("Profile ID", "T2")]),
            row(&[("Name", "Blank"), ("Profile ID", "T3")]),
        ]);
        let cache = cache_with(&source);

        let report = cache.refresh().await.unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.unverified, 2);
        assert!(report.published);

        let snapshot = cache.get_all().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records()[0].profile_id, "T1");
        assert_eq!(snapshot.records()[0].subjects, vec!["Math", "Physics"]);
        assert!(cache.get_by_id("T2").await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_for_unchanged_source() {
        let source = StaticSource::new(vec![
            verified_row("A", "Urdu", "English"),
            verified_row("B", "Chemistry", ""),
        ]);
        let cache = cache_with(&source);

        cache.refresh().await.unwrap();
        let first = cache.get_all().await;
        cache.refresh().await.unwrap();
        let second = cache.get_all().await;

        assert_eq!(first.records(), second.records());
        assert_eq!(second.generation(), first.generation() + 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = StaticSource::new(vec![verified_row("A", "Math", "")]);
        let cache = cache_with(&source);
        cache.refresh().await.unwrap();
        let before = cache.get_all().await;

        source.fail_with(SourceError::Unavailable("quota exceeded".to_owned()));
        let err = cache.refresh().await.unwrap_err();
        assert!(matches!(err, ServiceError::SourceUnavailable(_)));

        let after = cache.get_all().await;
        assert_eq!(before.records(), after.records());
        assert_eq!(before.refreshed_at(), after.refreshed_at());
    }

    #[tokio::test]
    async fn test_failed_first_refresh_leaves_cache_empty() {
        let source = StaticSource::failing(SourceError::NotFound("Tutors".to_owned()));
        let cache = cache_with(&source);
        assert!(cache.refresh().await.is_err());
        assert!(cache.get_all().await.is_empty());
        assert_eq!(cache.get_all().await.generation(), 0);
    }

    #[tokio::test]
    async fn test_no_verified_rows_keeps_previous_snapshot() {
        let source = StaticSource::new(vec![verified_row("A", "Math", "")]);
        let cache = cache_with(&source);
        cache.refresh().await.unwrap();

        source.set_rows(vec![row(&[("Name", "A"), ("Verified", "No")])]);
        let report = cache.refresh().await.unwrap();
        assert!(!report.published);
        assert_eq!(report.generation, 1);
        assert_eq!(cache.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_one_refetch() {
        let source = StaticSource::new(vec![verified_row("A", "Math", "")]);
        let cache = cache_with(&source);

        assert!(matches!(cache.refresh_if_stale(TTL).await.unwrap(), RefreshOutcome::Refreshed(_)));
        assert_eq!(cache.refresh_if_stale(TTL).await.unwrap(), RefreshOutcome::Fresh);
        assert_eq!(source.calls(), 1);

        cache.invalidate().await;
        assert_eq!(cache.get_all().await.len(), 1);
        assert!(matches!(cache.refresh_if_stale(TTL).await.unwrap(), RefreshOutcome::Refreshed(_)));
        assert_eq!(cache.refresh_if_stale(TTL).await.unwrap(), RefreshOutcome::Fresh);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let source = StaticSource::new(vec![verified_row("A", "Math", "")])
            .with_delay(Duration::from_secs(30));
        let cache = DirectoryCache::new(
            Arc::clone(&source) as Arc<dyn RowSource>,
            Duration::from_secs(2),
        );

        let err = cache.refresh().await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::SourceUnavailable(SourceError::Timeout(d)) if d == Duration::from_secs(2)
        ));
        assert!(cache.get_all().await.is_empty());
    }
}
