//! Tutor self-registration: validate, reject known id cards, append an
//! unverified row. New rows only reach the directory once a moderator marks
//! them verified in the sheet.

use std::sync::Arc;

use aplus_core::{
    Column, IMAGE_NOT_AVAILABLE, Row, RowSink, UNVERIFIED_MARKER, build_subjects, is_valid_id_card,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{DirectoryQueryService, ServiceError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationInput {
    pub name: String,
    pub id_card: String,
    pub qualification: String,
    #[serde(default)]
    pub subject: Option<String>,
    /// Comma-separated
    #[serde(default)]
    pub major_subjects: Option<String>,
    pub experience: u32,
    pub phone: String,
    pub bio: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub tehsil: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub exact_location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Already-hosted image; uploads happen elsewhere.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub profile_id: String,
    pub message: String,
    pub verified: bool,
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

fn optional(value: Option<&String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

fn coordinate(value: Option<f64>, field: &str, bound: f64) -> Result<String, ServiceError> {
    match value {
        None => Ok(String::new()),
        Some(v) if v.is_finite() && v.abs() <= bound => Ok(v.to_string()),
        Some(v) => Err(ServiceError::InvalidInput(format!("{field} {v} is out of range"))),
    }
}

impl RegistrationInput {
    /// Validate and build the sheet row for this submission.
    fn to_row(&self, profile_id: &str) -> Result<Row, ServiceError> {
        let name = required(&self.name, "name")?;
        let qualification = required(&self.qualification, "qualification")?;
        let phone = required(&self.phone, "phone")?;
        let bio = required(&self.bio, "bio")?;
        let id_card = required(&self.id_card, "id_card")?;
        if !is_valid_id_card(id_card) {
            return Err(ServiceError::InvalidInput(
                "id_card must be 13 digits, optionally formatted 12345-1234567-1".to_owned(),
            ));
        }
        let latitude = coordinate(self.latitude, "latitude", 90.0)?;
        let longitude = coordinate(self.longitude, "longitude", 180.0)?;

        let subject = optional(self.subject.as_ref());
        let primary = subject.to_lowercase();
        // Stored already deduplicated so the sheet reads the same as the API.
        let major_subjects = build_subjects(&subject, &optional(self.major_subjects.as_ref()))
            .into_iter()
            .filter(|s| s.to_lowercase() != primary)
            .collect::<Vec<_>>()
            .join(", ");
        let image_url = match optional(self.image_url.as_ref()) {
            url if url.is_empty() => IMAGE_NOT_AVAILABLE.to_owned(),
            url => url,
        };

        let cells = [
            (Column::ProfileId, profile_id.to_owned()),
            (Column::DateAdded, Utc::now().format("%Y-%m-%d").to_string()),
            (Column::Name, name.to_owned()),
            (Column::IdCard, id_card.to_owned()),
            (Column::Qualification, qualification.to_owned()),
            (Column::Subject, subject),
            (Column::MajorSubjects, major_subjects),
            (Column::Experience, self.experience.to_string()),
            (Column::Phone, phone.to_owned()),
            (Column::Bio, bio.to_owned()),
            (Column::Province, optional(self.province.as_ref())),
            (Column::District, optional(self.district.as_ref())),
            (Column::Tehsil, optional(self.tehsil.as_ref())),
            (Column::City, optional(self.city.as_ref())),
            (Column::ExactLocation, optional(self.exact_location.as_ref())),
            (Column::Latitude, latitude),
            (Column::Longitude, longitude),
            (Column::ImageUrl, image_url),
            (Column::ProfileUrl, optional(self.profile_url.as_ref())),
            (Column::Verified, UNVERIFIED_MARKER.to_owned()),
        ];
        Ok(cells.into_iter().map(|(column, value)| (column.header().to_owned(), value)).collect())
    }
}

pub struct RegistrationService {
    directory: Arc<DirectoryQueryService>,
    sink: Arc<dyn RowSink>,
}

impl RegistrationService {
    #[must_use]
    pub fn new(directory: Arc<DirectoryQueryService>, sink: Arc<dyn RowSink>) -> Self {
        Self { directory, sink }
    }

    pub async fn register(
        &self,
        input: RegistrationInput,
    ) -> Result<RegistrationReceipt, ServiceError> {
        let profile_id = uuid::Uuid::new_v4().to_string();
        let row = input.to_row(&profile_id)?;

        match self.directory.check_id_registered(&input.id_card).await {
            Ok(true) => {
                return Err(ServiceError::Duplicate(
                    "a tutor with this id card is already registered".to_owned(),
                ));
            },
            Ok(false) => {},
            Err(e) => {
                tracing::warn!(error = %e, "directory unavailable, skipping duplicate id check");
            },
        }

        self.sink.append_row(&row).await?;
        tracing::info!(%profile_id, "tutor registration stored for review");
        Ok(RegistrationReceipt {
            profile_id,
            message: "Tutor registered successfully! Your profile will be listed once verified."
                .to_owned(),
            verified: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DirectoryCache;
    use crate::test_support::{RecordingSink, StaticSource, row};
    use aplus_core::{RowSource, SourceError};
    use std::time::Duration;

    fn input() -> RegistrationInput {
        RegistrationInput {
            name: " Mehwish Ali ".to_owned(),
            id_card: "35202-1234567-1".to_owned(),
            qualification: "BS Mathematics".to_owned(),
            subject: Some("Math".to_owned()),
            major_subjects: Some("math, Statistics, ".to_owned()),
            experience: 3,
            phone: "03211234567".to_owned(),
            bio: "Matric and FSc".to_owned(),
            city: Some("Faisalabad".to_owned()),
            latitude: Some(31.45),
            longitude: Some(73.13),
            ..RegistrationInput::default()
        }
    }

    fn services(
        source: &Arc<StaticSource>,
        sink: &Arc<RecordingSink>,
    ) -> RegistrationService {
        let cache = Arc::new(DirectoryCache::new(
            Arc::clone(source) as Arc<dyn RowSource>,
            Duration::from_secs(5),
        ));
        let directory = Arc::new(DirectoryQueryService::new(cache, Duration::from_secs(300)));
        RegistrationService::new(directory, Arc::clone(sink) as Arc<dyn RowSink>)
    }

    fn listed(id_card: &str) -> Row {
        row(&[("Name", "Existing"), ("Verified", "Yes"), ("ID Card Number", id_card)])
    }

    #[tokio::test]
    async fn test_register_appends_unverified_row() {
        let source = StaticSource::new(vec![listed("11111-1111111-1")]);
        let sink = RecordingSink::new();
        let receipt = services(&source, &sink).register(input()).await.unwrap();

        assert!(!receipt.verified);
        let appended = sink.appended();
        assert_eq!(appended.len(), 1);
        let stored = &appended[0];
        assert_eq!(stored["Name"], "Mehwish Ali");
        assert_eq!(stored["Verified"], "No");
        assert_eq!(stored["Profile ID"], receipt.profile_id);
        assert_eq!(stored["Major Subjects"], "Statistics");
        assert_eq!(stored["Image URL"], IMAGE_NOT_AVAILABLE);
        assert_eq!(stored["Experience"], "3");
        assert_eq!(stored["Latitude"], "31.45");
    }

    #[tokio::test]
    async fn test_register_rejects_known_id_card() {
        let source = StaticSource::new(vec![listed("3520212345671")]);
        let sink = RecordingSink::new();
        let err = services(&source, &sink).register(input()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
        assert!(sink.appended().is_empty());
    }

    #[tokio::test]
    async fn test_register_proceeds_when_directory_unavailable() {
        let source = StaticSource::failing(SourceError::Unavailable("down".to_owned()));
        let sink = RecordingSink::new();
        services(&source, &sink).register(input()).await.unwrap();
        assert_eq!(sink.appended().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validates_before_touching_sheet() {
        let source = StaticSource::new(vec![listed("11111-1111111-1")]);
        let sink = RecordingSink::new();
        let svc = services(&source, &sink);

        let bad_card = RegistrationInput { id_card: "12345".to_owned(), ..input() };
        assert!(matches!(svc.register(bad_card).await, Err(ServiceError::InvalidInput(_))));

        let no_name = RegistrationInput { name: "   ".to_owned(), ..input() };
        assert!(matches!(svc.register(no_name).await, Err(ServiceError::InvalidInput(_))));

        let bad_lat = RegistrationInput { latitude: Some(123.0), ..input() };
        assert!(matches!(svc.register(bad_lat).await, Err(ServiceError::InvalidInput(_))));

        assert_eq!(source.calls(), 0);
        assert!(sink.appended().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_is_source_unavailable() {
        let source = StaticSource::new(vec![listed("11111-1111111-1")]);
        let sink = RecordingSink::new();
        sink.fail_with(SourceError::Unauthorized("token expired".to_owned()));
        let err = services(&source, &sink).register(input()).await.unwrap_err();
        assert!(matches!(err, ServiceError::SourceUnavailable(SourceError::Unauthorized(_))));
    }
}
