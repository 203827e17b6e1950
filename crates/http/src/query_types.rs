//! Request/query types (Deserialize)

use aplus_core::DEFAULT_PAGE_LIMIT;
use aplus_service::{PageRequest, TutorFilter};
use serde::Deserialize;

const fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct TutorListQuery {
    pub city: Option<String>,
    pub subject: Option<String>,
    pub q: Option<String>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl TutorListQuery {
    pub fn filter(&self) -> TutorFilter {
        TutorFilter { city: self.city.clone(), subject: self.subject.clone(), q: self.q.clone() }
    }

    /// `PageRequest` clamps the limit, so `limit=0` still returns one item.
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.offset, self.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckIdQuery {
    #[serde(default)]
    pub id_card: String,
}
