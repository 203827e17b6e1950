use std::sync::Arc;
use std::time::Duration;

use aplus_core::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, TutorRecord, canonical_id_card};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ServiceError;
use crate::directory_cache::{DirectoryCache, RefreshReport, Snapshot};

/// Client-facing text for a directory that cannot be served. Source details
/// stay in the logs.
pub const DIRECTORY_UNAVAILABLE: &str = "tutor directory is temporarily unavailable";

/// Optional listing filters. Blank values are ignored.
#[derive(Debug, Clone, Default)]
pub struct TutorFilter {
    /// Exact city or district, case-insensitive
    pub city: Option<String>,
    /// Substring of any subject, case-insensitive
    pub subject: Option<String>,
    /// Free text over name, qualification, bio and subjects
    pub q: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl TutorFilter {
    pub fn matches(&self, record: &TutorRecord) -> bool {
        non_blank(self.city.as_ref()).is_none_or(|city| record.is_in_city(city))
            && non_blank(self.subject.as_ref()).is_none_or(|subject| record.teaches(subject))
            && non_blank(self.q.as_ref()).is_none_or(|q| record.matches_text(q))
    }
}

/// Offset/limit window. `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit: limit.clamp(1, MAX_PAGE_LIMIT) }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorPage {
    pub items: Vec<TutorRecord>,
    /// Matches before pagination
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryStatus {
    pub records: usize,
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub stale: bool,
    pub ttl_secs: u64,
}

/// Read-with-lazy-refresh access to the directory for HTTP handlers.
///
/// Availability wins over freshness: when a refresh fails but a snapshot
/// exists, the stale snapshot is served.
pub struct DirectoryQueryService {
    cache: Arc<DirectoryCache>,
    ttl: Duration,
}

impl DirectoryQueryService {
    #[must_use]
    pub fn new(cache: Arc<DirectoryCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>, ServiceError> {
        if let Err(err) = self.cache.refresh_if_stale(self.ttl).await {
            let current = self.cache.get_all().await;
            if current.is_empty() {
                tracing::warn!(error = %err, "tutor directory unavailable, nothing cached");
                return Err(ServiceError::ServiceUnavailable(DIRECTORY_UNAVAILABLE.to_owned()));
            }
            tracing::warn!(
                error = %err,
                generation = current.generation(),
                "serving stale tutor directory"
            );
            return Ok(current);
        }
        Ok(self.cache.get_all().await)
    }

    pub async fn list_tutors(
        &self,
        filter: &TutorFilter,
        page: PageRequest,
    ) -> Result<TutorPage, ServiceError> {
        let snapshot = self.snapshot().await?;
        let matching: Vec<&TutorRecord> =
            snapshot.records().iter().filter(|r| filter.matches(r)).collect();
        let total = matching.len();
        let items: Vec<TutorRecord> =
            matching.into_iter().skip(page.offset).take(page.limit).cloned().collect();
        let has_more = page.offset.saturating_add(items.len()) < total;
        Ok(TutorPage { items, total, offset: page.offset, limit: page.limit, has_more })
    }

    pub async fn get_tutor(&self, profile_id: &str) -> Result<TutorRecord, ServiceError> {
        let snapshot = self.snapshot().await?;
        snapshot
            .get_by_id(profile_id.trim())
            .cloned()
            .ok_or_else(|| ServiceError::NotFound { profile_id: profile_id.to_owned() })
    }

    /// Best-effort duplicate check: registrations newer than the snapshot and
    /// unverified submissions are not visible here.
    pub async fn check_id_registered(&self, id_card: &str) -> Result<bool, ServiceError> {
        let wanted = canonical_id_card(id_card);
        if wanted.is_empty() {
            return Ok(false);
        }
        let snapshot = self.snapshot().await?;
        Ok(snapshot.records().iter().any(|r| canonical_id_card(&r.id_card) == wanted))
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    /// Forced refresh, bypassing the staleness check.
    pub async fn refresh(&self) -> Result<RefreshReport, ServiceError> {
        self.cache.refresh().await
    }

    /// Cache state without triggering a refresh.
    pub async fn status(&self) -> DirectoryStatus {
        let snapshot = self.cache.get_all().await;
        DirectoryStatus {
            records: snapshot.len(),
            generation: snapshot.generation(),
            refreshed_at: snapshot.refreshed_at(),
            stale: snapshot.is_stale(Utc::now(), self.ttl),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
