//! Shared constants for the tutor directory.

/// Maximum page size for any listing query (DoS protection).
pub const MAX_PAGE_LIMIT: usize = 100;

/// Page size when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Default snapshot time-to-live in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default deadline for one row source call in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 15;

/// Worksheet holding tutor submissions.
pub const DEFAULT_SHEET_NAME: &str = "Tutors";

/// Worksheet holding job postings.
pub const DEFAULT_JOBS_SHEET_NAME: &str = "Jobs";

/// Sentinel stored in the image column when no image was uploaded.
pub const IMAGE_NOT_AVAILABLE: &str = "N/A";

/// Value written to the Verified column for new submissions.
pub const UNVERIFIED_MARKER: &str = "No";

/// Spreadsheet row number of the first data row (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;
