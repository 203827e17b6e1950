use serde::{Deserialize, Serialize};

/// Where a tutor teaches. Every field defaults to an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub province: String,
    pub district: String,
    pub tehsil: String,
    pub city: String,
    pub area1: String,
    pub area2: String,
    pub area3: String,
    /// Free-text location typed by the tutor.
    pub exact_location: String,
    pub latitude: String,
    pub longitude: String,
}

/// A verified tutor listing as served by the directory API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TutorRecord {
    /// Stable identifier, unique within a snapshot
    pub profile_id: String,
    pub name: String,
    pub qualification: String,
    pub experience: String,
    pub phone: String,
    pub bio: String,
    /// Primary subject first, then major subjects; no duplicates
    pub subjects: Vec<String>,
    pub location: Location,
    /// External image URL or `"N/A"`
    pub image_url: String,
    pub verified: bool,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub date_added: String,
    /// National id card number. Only used for duplicate-registration checks.
    #[serde(skip)]
    pub id_card: String,
}

impl TutorRecord {
    /// Case-insensitive match on city or district.
    pub fn is_in_city(&self, city: &str) -> bool {
        let wanted = city.trim().to_lowercase();
        [&self.location.city, &self.location.district]
            .into_iter()
            .any(|place| place.trim().to_lowercase() == wanted)
    }

    /// Case-insensitive substring match against any subject.
    pub fn teaches(&self, subject: &str) -> bool {
        let needle = subject.trim().to_lowercase();
        self.subjects.iter().any(|s| s.to_lowercase().contains(&needle))
    }

    /// Case-insensitive substring match over the searchable text fields.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.qualification, &self.bio]
            .into_iter()
            .chain(self.subjects.iter())
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
