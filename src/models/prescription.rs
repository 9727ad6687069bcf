use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single prescribed medication, as recorded at upload time.
///
/// Immutable once created — a re-upload inserts new rows rather than
/// mutating existing ones. `medicine_name` is normalized to lowercase so
/// regimen lookups stay case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionEntry {
    pub id: Uuid,
    pub user_id: i64,
    pub upload_time: NaiveDateTime,
    pub medicine_name: String,
    pub medicine_dosage: String,
    pub times_per_day: u32,
    /// Comma-joined time-of-day labels, e.g. "morning, night".
    pub time_of_day: String,
}

impl PrescriptionEntry {
    pub fn new(
        user_id: i64,
        upload_time: NaiveDateTime,
        medicine_name: &str,
        medicine_dosage: &str,
        times_per_day: u32,
        times_of_day: &[String],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            upload_time,
            medicine_name: medicine_name.to_lowercase(),
            medicine_dosage: medicine_dosage.to_string(),
            times_per_day,
            time_of_day: times_of_day.join(", "),
        }
    }

    /// The individual time-of-day tokens of this prescription.
    pub fn times(&self) -> Vec<&str> {
        self.time_of_day
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}
