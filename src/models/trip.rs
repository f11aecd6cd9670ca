use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Date format of the HTML date inputs and of the persisted documents.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: String,
    pub destination: String,
    #[serde(rename = "start-date")]
    pub start_date: NaiveDate,
    #[serde(rename = "end-date")]
    pub end_date: NaiveDate,
    #[serde(rename = "image-url")]
    pub image_url: Option<String>,
    #[serde(rename = "packing-list")]
    pub packing_list: Option<String>,
    pub notes: Option<String>,
}

impl Trip {
    pub fn new(fields: NewTrip) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            destination: fields.destination,
            start_date: fields.start_date,
            end_date: fields.end_date,
            image_url: fields.image_url,
            packing_list: fields.packing_list,
            notes: fields.notes,
        }
    }
}

/// Normalized trip fields, still without an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image_url: Option<String>,
    pub packing_list: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Destination must not be empty")]
    EmptyDestination,
    #[error("{field} is not a valid date")]
    InvalidDate { field: &'static str },
    #[error("End date cannot be before start date")]
    DateOrder,
}

/// Raw form fields as submitted by the trip form. The serde names match the
/// input names of the form markup.
#[derive(Debug, Clone, Deserialize)]
pub struct TripForm {
    pub destination: String,
    #[serde(rename = "start-date")]
    pub start_date: String,
    #[serde(rename = "end-date")]
    pub end_date: String,
    #[serde(rename = "image-url")]
    pub image_url: Option<String>,
    #[serde(rename = "packing-list")]
    pub packing_list: Option<String>,
    pub notes: Option<String>,
}

impl TripForm {
    /// Checks a submission and produces the normalized fields. Pure: the
    /// same input always yields the same result, nothing is mutated.
    pub fn validate(&self) -> Result<NewTrip, ValidationError> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(ValidationError::EmptyDestination);
        }

        let start_date = parse_date("start-date", &self.start_date)?;
        let end_date = parse_date("end-date", &self.end_date)?;
        if end_date < start_date {
            return Err(ValidationError::DateOrder);
        }

        Ok(NewTrip {
            destination: destination.to_string(),
            start_date,
            end_date,
            image_url: normalize_optional(self.image_url.clone()),
            packing_list: normalize_optional(self.packing_list.clone()),
            notes: normalize_optional(self.notes.clone()),
        })
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { field })
}

fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Sample trips the store gets seeded with on first start.
pub fn initial_trips() -> Vec<Trip> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date");
    vec![
        Trip {
            id: Uuid::new_v4().to_string(),
            destination: "Lisbon".to_string(),
            start_date: date(2024, 6, 3),
            end_date: date(2024, 6, 10),
            image_url: Some(
                "https://images.unsplash.com/photo-1585208798174-6cedd86e019a".to_string(),
            ),
            packing_list: Some("passport, sunscreen, walking shoes".to_string()),
            notes: Some("Ride tram 28 early in the morning".to_string()),
        },
        Trip {
            id: Uuid::new_v4().to_string(),
            destination: "Amalfi Coast".to_string(),
            start_date: date(2024, 9, 14),
            end_date: date(2024, 9, 21),
            image_url: Some(
                "https://images.unsplash.com/photo-1533606688076-b6683a5f59f1".to_string(),
            ),
            packing_list: Some("swimsuit, hiking boots".to_string()),
            notes: Some("Book the Path of the Gods hike ahead".to_string()),
        },
        Trip {
            id: Uuid::new_v4().to_string(),
            destination: "Reykjavik".to_string(),
            start_date: date(2025, 2, 7),
            end_date: date(2025, 2, 12),
            image_url: None,
            packing_list: Some("thermal layers, tripod".to_string()),
            notes: None,
        },
    ]
}
