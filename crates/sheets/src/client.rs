use std::time::Duration;

use aplus_core::{Row, RowSink, RowSource, SourceError};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::values::{AppendBody, ValueRange, cell_text, cells_for_header, rows_from_grid};

/// Public Google Sheets API endpoint.
pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com";

/// Longest error body kept in an error message.
const MAX_ERROR_BODY_LEN: usize = 300;

/// Connection settings for one worksheet.
#[derive(Clone)]
pub struct SheetsConfig {
    pub api_url: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    /// Pre-issued OAuth bearer token.
    pub token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_url", &self.api_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Row source and sink backed by the Sheets v4 `values` API.
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    sheet_name: String,
    token: String,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("token", &"***")
            .finish()
    }
}

impl SheetsClient {
    /// Creates a client for the configured worksheet.
    ///
    /// # Errors
    /// Returns an error if the API URL is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: SheetsConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(config.api_url.trim_end_matches('/')).map_err(|e| {
            SourceError::Unavailable(format!("invalid sheets api url '{}': {e}", config.api_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Unavailable(format!(
                "sheets api url '{}' cannot be a base",
                config.api_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("client initialization failed: {e}")))?;
        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id,
            sheet_name: config.sheet_name,
            token: config.token,
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}`
    fn values_url(&self, range: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::Unavailable("sheets api url cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    async fn get_grid(&self, range: &str) -> Result<ValueRange, SourceError> {
        let url = self.values_url(range)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        let response = check_status(response, range).await?;
        let body = response.text().await.map_err(|e| SourceError::Unavailable(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            SourceError::Malformed(format!(
                "values response for '{range}': {e} (body: {})",
                truncate(&body, MAX_ERROR_BODY_LEN)
            ))
        })
    }

    /// Header cells of the worksheet, trimmed.
    pub async fn fetch_header(&self) -> Result<Vec<String>, SourceError> {
        let grid = self.get_grid(&format!("{}!1:1", self.sheet_name)).await?;
        let header = grid
            .values
            .first()
            .map(|cells| cells.iter().map(|c| cell_text(c).trim().to_owned()).collect())
            .unwrap_or_default();
        Ok(header)
    }
}

async fn check_status(
    response: reqwest::Response,
    range: &str,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
    let detail = format!("HTTP {} for '{range}': {}", status.as_u16(), truncate(&body, MAX_ERROR_BODY_LEN));
    Err(match status {
        StatusCode::NOT_FOUND => SourceError::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::Unauthorized(detail),
        _ => SourceError::Unavailable(detail),
    })
}

#[async_trait]
impl RowSource for SheetsClient {
    async fn fetch_all_rows(&self) -> Result<Vec<Row>, SourceError> {
        let grid = self.get_grid(&self.sheet_name).await?;
        let rows = rows_from_grid(&grid.values);
        tracing::debug!(sheet = %self.sheet_name, rows = rows.len(), "fetched sheet rows");
        Ok(rows)
    }
}

#[async_trait]
impl RowSink for SheetsClient {
    async fn append_row(&self, row: &Row) -> Result<(), SourceError> {
        let header = self.fetch_header().await?;
        if header.is_empty() {
            return Err(SourceError::Malformed(format!(
                "sheet '{}' has no header row",
                self.sheet_name
            )));
        }
        let range = format!("{}!A1:append", self.sheet_name);
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = AppendBody { values: vec![cells_for_header(&header, row)] };
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        check_status(response, &range).await?;
        tracing::info!(sheet = %self.sheet_name, "appended row");
        Ok(())
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
