//! Mapping from raw sheet rows to `TutorRecord`s.
//!
//! A single place decides what a tutor record contains. Rows that are not
//! verified are counted and dropped; verified rows that cannot be mapped are
//! reported as `NormalizationError` and dropped without affecting the rest.

use std::collections::HashSet;

use crate::columns::{Column, Row, RowView};
use crate::constants::{FIRST_DATA_ROW, IMAGE_NOT_AVAILABLE};
use crate::error::NormalizationError;
use crate::tutor::{Location, TutorRecord};

/// `true` when the Verified cell starts with `y`/`Y` after trimming.
pub fn is_verified(raw: &str) -> bool {
    raw.trim().chars().next().is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Primary subject first, then each comma-separated major subject.
///
/// Entries are trimmed; empty entries and repeats (case-insensitive) are dropped.
pub fn build_subjects(primary: &str, major: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(primary)
        .chain(major.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(ToOwned::to_owned)
        .collect()
}

/// Identifier for a row without its own Profile ID: its spreadsheet row number.
pub fn positional_profile_id(row_number: usize) -> String {
    format!("row-{row_number}")
}

/// The cell as-is when it is a coordinate within `bound`, otherwise empty.
///
/// Location is optional, so a bad cell only loses the coordinate, not the tutor.
fn coordinate_or_blank(row: usize, column: &'static str, value: &str, bound: f64) -> String {
    if value.is_empty() {
        return String::new();
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= bound => value.to_owned(),
        _ => {
            tracing::warn!(row, column, value, "ignoring invalid coordinate");
            String::new()
        },
    }
}

/// Map one verified row. `row_number` is the 1-based spreadsheet row.
pub fn normalize_row(row: &Row, row_number: usize) -> Result<TutorRecord, NormalizationError> {
    let view = RowView::new(row);

    let name = view.get_owned(Column::Name);
    if name.is_empty() {
        return Err(NormalizationError::MissingName { row: row_number });
    }

    let latitude = coordinate_or_blank(row_number, "latitude", view.get(Column::Latitude), 90.0);
    let longitude =
        coordinate_or_blank(row_number, "longitude", view.get(Column::Longitude), 180.0);

    let profile_id = match view.get(Column::ProfileId) {
        "" => positional_profile_id(row_number),
        id => id.to_owned(),
    };
    let image_url = match view.get(Column::ImageUrl) {
        "" => IMAGE_NOT_AVAILABLE.to_owned(),
        url => url.to_owned(),
    };

    Ok(TutorRecord {
        profile_id,
        name,
        qualification: view.get_owned(Column::Qualification),
        experience: view.get_owned(Column::Experience),
        phone: view.get_owned(Column::Phone),
        bio: view.get_owned(Column::Bio),
        subjects: build_subjects(view.get(Column::Subject), view.get(Column::MajorSubjects)),
        location: Location {
            province: view.get_owned(Column::Province),
            district: view.get_owned(Column::District),
            tehsil: view.get_owned(Column::Tehsil),
            city: view.get_owned(Column::City),
            area1: view.get_owned(Column::Area1),
            area2: view.get_owned(Column::Area2),
            area3: view.get_owned(Column::Area3),
            exact_location: view.get_owned(Column::ExactLocation),
            latitude,
            longitude,
        },
        image_url,
        verified: true,
        profile_url: view.get_owned(Column::ProfileUrl),
        date_added: view.get_owned(Column::DateAdded),
        id_card: view.get_owned(Column::IdCard),
    })
}

/// Result of normalizing a full fetch.
#[derive(Debug, Default)]
pub struct NormalizedRows {
    /// Accepted records in source order
    pub records: Vec<TutorRecord>,
    /// Rows skipped because they are not verified
    pub unverified: usize,
    /// Verified rows that could not be mapped
    pub rejected: Vec<NormalizationError>,
}

/// Filter, map and deduplicate a full sheet in source order.
///
/// The first occurrence of a profile id wins; later rows with the same id are
/// rejected.
pub fn normalize_rows(rows: &[Row]) -> NormalizedRows {
    let mut out = NormalizedRows::default();
    let mut ids = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index.saturating_add(FIRST_DATA_ROW);
        if !is_verified(RowView::new(row).get(Column::Verified)) {
            out.unverified = out.unverified.saturating_add(1);
            continue;
        }
        match normalize_row(row, row_number) {
            Ok(record) if !ids.insert(record.profile_id.clone()) => {
                out.rejected.push(NormalizationError::DuplicateProfileId {
                    row: row_number,
                    profile_id: record.profile_id,
                });
            },
            Ok(record) => out.records.push(record),
            Err(e) => out.rejected.push(e),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn test_is_verified_prefix_match() {
        assert!(is_verified("Yes"));
        assert!(is_verified("  y"));
        assert!(is_verified("YES!"));
        assert!(!is_verified("No"));
        assert!(!is_verified(""));
        assert!(!is_verified("  "));
        assert!(!is_verified("verified"));
    }

    #[test]
    fn test_subjects_primary_first_without_repeat() {
        assert_eq!(build_subjects("Math", "Math, Physics"), vec!["Math", "Physics"]);
    }

    #[test]
    fn test_subjects_drop_empty_and_duplicates() {
        assert_eq!(
            build_subjects("", " Chemistry,, chemistry , Biology ,"),
            vec!["Chemistry", "Biology"]
        );
        assert!(build_subjects("  ", "").is_empty());
    }

    #[test]
    fn test_scenario_single_verified_row() {
        let rows = vec![
            row(&[
                ("Name", "Hamza"),
                ("Verified", "Yes"),
                ("Subject", "Math"),
                ("Major Subjects", "Math, Physics"),
                ("Profile ID", "T1"),
            ]),
            row(&[("Name", "Usman"), ("Verified", "No"), ("Profile ID", "T2")]),
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].profile_id, "T1");
        assert_eq!(out.records[0].subjects, vec!["Math", "Physics"]);
        assert_eq!(out.unverified, 1);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn test_positional_id_uses_sheet_row_number() {
        let rows = vec![
            row(&[("Name", "A"), ("Verified", "no")]),
            row(&[("Name", "B"), ("Verified", "yes")]),
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out.records[0].profile_id, "row-3");
    }

    #[test]
    fn test_duplicate_profile_id_keeps_first() {
        let rows = vec![
            row(&[("Name", "A"), ("Verified", "Y"), ("ProfileID", "P9")]),
            row(&[("Name", "B"), ("Verified", "Y"), ("Profile ID", "P9")]),
        ];
        let out = normalize_rows(&rows);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "A");
        assert_eq!(
            out.rejected,
            vec![NormalizationError::DuplicateProfileId { row: 3, profile_id: "P9".to_owned() }]
        );
    }

    #[test]
    fn test_bad_row_does_not_abort_batch() {
        let rows = vec![
            row(&[("Verified", "Yes")]),
            row(&[("Name", "C"), ("Verified", "Yes"), ("Profile ID", "C1")]),
            row(&[("Name", "D"), ("Verified", "Yes"), ("Profile ID", "C1")]),
            row(&[("Name", "E"), ("Verified", "Yes"), ("Latitude", "31.52"), ("Longitude", "74.35")]),
        ];
        let out = normalize_rows(&rows);
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "E"]);
        assert_eq!(out.rejected.len(), 2);
        assert_eq!(out.rejected[0], NormalizationError::MissingName { row: 2 });
    }

    #[test]
    fn test_invalid_coordinates_are_blanked_not_rejected() {
        let rows = vec![row(&[
            ("Name", "Ali"),
            ("Verified", "Yes"),
            ("Profile ID", "T9"),
            ("Latitude", "31.5N"),
            ("Longitude", "200"),
            ("City", "Sialkot"),
        ])];
        let out = normalize_rows(&rows);
        assert!(out.rejected.is_empty());
        assert_eq!(out.records.len(), 1);
        let location = &out.records[0].location;
        assert_eq!(location.latitude, "");
        assert_eq!(location.longitude, "");
        assert_eq!(location.city, "Sialkot");
    }

    #[test]
    fn test_valid_coordinates_are_kept_verbatim() {
        let r = row(&[("Name", "F"), ("Verified", "Yes"), ("Lat", "-33.9"), ("Lng", "151.2")]);
        let record = normalize_row(&r, 2).unwrap();
        assert_eq!(record.location.latitude, "-33.9");
        assert_eq!(record.location.longitude, "151.2");
    }

    #[test]
    fn test_fields_trimmed_and_defaults_applied() {
        let r = row(&[
            ("Full Name", "  Nadia  "),
            ("Verified", "Yes"),
            ("City", " Multan "),
            ("Image URL", ""),
        ]);
        let record = normalize_row(&r, 7).unwrap();
        assert_eq!(record.name, "Nadia");
        assert_eq!(record.location.city, "Multan");
        assert_eq!(record.location.tehsil, "");
        assert_eq!(record.image_url, IMAGE_NOT_AVAILABLE);
        assert_eq!(record.profile_id, "row-7");
        assert!(record.verified);
    }
}
