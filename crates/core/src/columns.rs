//! Spreadsheet column names and tolerant header matching.
//!
//! The tutor sheet has been edited by hand over time, so the same field shows
//! up under several headers (`Profile ID`, `ProfileID`, `profile_id`). Headers
//! are compared by their lowercase alphanumeric form against a per-column
//! alias list.

use std::collections::HashMap;

/// One raw spreadsheet row keyed by header text.
pub type Row = HashMap<String, String>;

/// Lowercase a header and drop everything that is not ASCII alphanumeric.
pub fn column_key(header: &str) -> String {
    header.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase()).collect()
}

/// Columns the directory knows how to read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ProfileId,
    Name,
    IdCard,
    Qualification,
    Subject,
    MajorSubjects,
    Experience,
    Phone,
    Bio,
    Province,
    District,
    Tehsil,
    City,
    Area1,
    Area2,
    Area3,
    ExactLocation,
    Latitude,
    Longitude,
    ImageUrl,
    Verified,
    ProfileUrl,
    DateAdded,
}

impl Column {
    pub const ALL: [Self; 23] = [
        Self::ProfileId,
        Self::Name,
        Self::IdCard,
        Self::Qualification,
        Self::Subject,
        Self::MajorSubjects,
        Self::Experience,
        Self::Phone,
        Self::Bio,
        Self::Province,
        Self::District,
        Self::Tehsil,
        Self::City,
        Self::Area1,
        Self::Area2,
        Self::Area3,
        Self::ExactLocation,
        Self::Latitude,
        Self::Longitude,
        Self::ImageUrl,
        Self::Verified,
        Self::ProfileUrl,
        Self::DateAdded,
    ];

    /// Header written when this service creates a row.
    pub fn header(self) -> &'static str {
        match self {
            Self::ProfileId => "Profile ID",
            Self::Name => "Name",
            Self::IdCard => "ID Card Number",
            Self::Qualification => "Qualification",
            Self::Subject => "Subject",
            Self::MajorSubjects => "Major Subjects",
            Self::Experience => "Experience",
            Self::Phone => "Phone",
            Self::Bio => "Bio",
            Self::Province => "Province",
            Self::District => "District",
            Self::Tehsil => "Tehsil",
            Self::City => "City",
            Self::Area1 => "Area 1",
            Self::Area2 => "Area 2",
            Self::Area3 => "Area 3",
            Self::ExactLocation => "Exact Location",
            Self::Latitude => "Latitude",
            Self::Longitude => "Longitude",
            Self::ImageUrl => "Image URL",
            Self::Verified => "Verified",
            Self::ProfileUrl => "Profile URL",
            Self::DateAdded => "Date Added",
        }
    }

    /// Accepted header spellings, already in `column_key` form, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::ProfileId => &["profileid"],
            Self::Name => &["name", "fullname", "tutorname"],
            Self::IdCard => &["idcardnumber", "idcard", "cnic"],
            Self::Qualification => &["qualification"],
            Self::Subject => &["subject", "primarysubject"],
            Self::MajorSubjects => &["majorsubjects"],
            Self::Experience => &["experience"],
            Self::Phone => &["phone", "phonenumber"],
            Self::Bio => &["bio"],
            Self::Province => &["province"],
            Self::District => &["district"],
            Self::Tehsil => &["tehsil"],
            Self::City => &["city"],
            Self::Area1 => &["area1"],
            Self::Area2 => &["area2"],
            Self::Area3 => &["area3"],
            Self::ExactLocation => &["exactlocation"],
            Self::Latitude => &["latitude", "lat"],
            Self::Longitude => &["longitude", "lng"],
            Self::ImageUrl => &["imageurl", "image", "thumbnail"],
            Self::Verified => &["verified"],
            Self::ProfileUrl => &["profileurl"],
            Self::DateAdded => &["dateadded"],
        }
    }

    /// Resolve a sheet header to a known column.
    pub fn from_header(header: &str) -> Option<Self> {
        let key = column_key(header);
        Self::ALL.into_iter().find(|column| column.aliases().contains(&key.as_str()))
    }
}

/// Read-only view of a `Row` with header-tolerant, trimmed lookups.
#[derive(Debug)]
pub struct RowView<'a> {
    cells: HashMap<String, &'a str>,
}

impl<'a> RowView<'a> {
    /// Headers that reduce to the same key are merged: visited in header
    /// order, the first non-empty value wins.
    pub fn new(row: &'a Row) -> Self {
        let mut entries: Vec<(&String, &'a String)> = row.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut cells: HashMap<String, &'a str> = HashMap::with_capacity(entries.len());
        for (header, value) in entries {
            let slot = cells.entry(column_key(header)).or_insert("");
            if slot.trim().is_empty() {
                *slot = value.as_str();
            }
        }
        Self { cells }
    }

    /// First non-empty trimmed value among the column's aliases, or `""`.
    pub fn get(&self, column: Column) -> &'a str {
        column
            .aliases()
            .iter()
            .filter_map(|alias| self.cells.get(*alias))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    pub fn get_owned(&self, column: Column) -> String {
        self.get(column).to_owned()
    }
}
