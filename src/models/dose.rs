use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Segment;

/// One verified dose taken by the user.
///
/// Append-only: created exactly once per successfully verified ingestion,
/// never updated or deleted. `(user_id, day, time_of_day, medicine_name)`
/// is unique across the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseEvent {
    pub id: Uuid,
    pub user_id: i64,
    pub log_time: NaiveDateTime,
    pub medicine_name: String,
    pub medicine_dosage: String,
    /// Derived from `log_time`.
    pub day: NaiveDate,
    pub time_of_day: Segment,
}

impl DoseEvent {
    pub fn new(
        user_id: i64,
        log_time: NaiveDateTime,
        medicine_name: &str,
        medicine_dosage: &str,
        time_of_day: Segment,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            log_time,
            medicine_name: medicine_name.to_lowercase(),
            medicine_dosage: medicine_dosage.to_string(),
            day: log_time.date(),
            time_of_day,
        }
    }
}
