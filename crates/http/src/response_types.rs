//! Response types (Serialize)

use aplus_core::Row;
use aplus_service::RefreshReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CheckIdResponse {
    pub id_card: String,
    pub registered: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub report: RefreshReport,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    /// One object per job row, keyed by the sheet's header
    pub jobs: Vec<Row>,
}
