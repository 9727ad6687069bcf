//! Regimen verification gates.
//!
//! Pure boolean checks over the prescription map and the dose log.
//! Gates never raise for a business rejection — they hand back a typed
//! `Rejection` that only the pipeline translates into the outward
//! result shape.

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{DoseEvent, Segment};

/// A business-rule rejection from the verification gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The medicine is not prescribed for this time window.
    NotPrescribed {
        medicine_name: String,
        time_of_day: Segment,
    },
    /// A dose for this (day, window, medicine) is already logged.
    AlreadyTaken {
        medicine_name: String,
        day: NaiveDate,
        time_of_day: Segment,
    },
}

impl Rejection {
    /// Human-readable message for the outward result.
    pub fn message(&self) -> String {
        match self {
            Self::NotPrescribed {
                medicine_name,
                time_of_day,
            } => format!("Medication '{medicine_name}' is not prescribed for {time_of_day}"),
            Self::AlreadyTaken {
                medicine_name,
                day,
                time_of_day,
            } => format!(
                "Medication '{medicine_name}' has already been taken for {time_of_day} on {day}"
            ),
        }
    }
}

/// True iff the medicine appears in the prescription map (case-folded)
/// and the segment is one of its prescribed time-of-day tokens.
pub fn is_prescribed(
    medicine_name: &str,
    time_of_day: Segment,
    prescribed: &HashMap<String, Vec<String>>,
) -> bool {
    prescribed
        .get(&medicine_name.to_lowercase())
        .is_some_and(|times| times.iter().any(|t| t == time_of_day.as_str()))
}

/// True iff a dose for the same (day, window, medicine) is already
/// logged. Pure read — calling it twice with the same unwritten
/// candidate returns the same answer.
pub fn is_duplicate(conn: &Connection, event: &DoseEvent) -> Result<bool, DatabaseError> {
    db::has_dose_logged(
        conn,
        event.user_id,
        event.day,
        event.time_of_day,
        &event.medicine_name,
    )
}

/// Run both gates for a candidate dose. `None` means the dose is valid.
pub fn verify_dose(
    conn: &Connection,
    event: &DoseEvent,
) -> Result<Option<Rejection>, DatabaseError> {
    let prescribed = db::prescribed_times(conn, event.user_id)?;

    if !is_prescribed(&event.medicine_name, event.time_of_day, &prescribed) {
        return Ok(Some(Rejection::NotPrescribed {
            medicine_name: event.medicine_name.clone(),
            time_of_day: event.time_of_day,
        }));
    }

    if is_duplicate(conn, event)? {
        return Ok(Some(Rejection::AlreadyTaken {
            medicine_name: event.medicine_name.clone(),
            day: event.day,
            time_of_day: event.time_of_day,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_dose_event, insert_prescription, open_memory_database};
    use crate::models::PrescriptionEntry;

    fn noon() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn aspirin_map() -> HashMap<String, Vec<String>> {
        let mut map = HashMap::new();
        map.insert(
            "aspirin".to_string(),
            vec!["morning".to_string(), "night".to_string()],
        );
        map
    }

    #[test]
    fn prescribed_window_matches() {
        let map = aspirin_map();
        assert!(is_prescribed("aspirin", Segment::Morning, &map));
        assert!(is_prescribed("ASPIRIN", Segment::Night, &map));
    }

    #[test]
    fn wrong_window_is_not_prescribed() {
        let map = aspirin_map();
        assert!(!is_prescribed("aspirin", Segment::Afternoon, &map));
    }

    #[test]
    fn unknown_medicine_is_not_prescribed() {
        let map = aspirin_map();
        assert!(!is_prescribed("metformin", Segment::Morning, &map));
    }

    #[test]
    fn is_duplicate_is_a_pure_read() {
        let conn = open_memory_database().unwrap();
        let candidate = DoseEvent::new(123, noon(), "aspirin", "200mg", Segment::Morning);

        // Same unwritten candidate twice: same answer, no side effect
        assert!(!is_duplicate(&conn, &candidate).unwrap());
        assert!(!is_duplicate(&conn, &candidate).unwrap());

        insert_dose_event(&conn, &candidate).unwrap();
        assert!(is_duplicate(&conn, &candidate).unwrap());
        assert!(is_duplicate(&conn, &candidate).unwrap());
    }

    #[test]
    fn verify_dose_passes_a_valid_candidate() {
        let conn = open_memory_database().unwrap();
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(123, noon(), "aspirin", "200mg", 2, &["afternoon".into()]),
        )
        .unwrap();

        let event = DoseEvent::new(123, noon(), "Aspirin", "200mg", Segment::Afternoon);
        assert_eq!(verify_dose(&conn, &event).unwrap(), None);
    }

    #[test]
    fn verify_dose_rejects_unprescribed_window() {
        let conn = open_memory_database().unwrap();
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(
                123,
                noon(),
                "aspirin",
                "200mg",
                2,
                &["morning".into(), "night".into()],
            ),
        )
        .unwrap();

        let event = DoseEvent::new(123, noon(), "aspirin", "200mg", Segment::Afternoon);
        let rejection = verify_dose(&conn, &event).unwrap().unwrap();
        assert!(matches!(rejection, Rejection::NotPrescribed { .. }));
        assert!(rejection.message().contains("not prescribed for afternoon"));
    }

    #[test]
    fn verify_dose_rejects_duplicate() {
        let conn = open_memory_database().unwrap();
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(123, noon(), "aspirin", "200mg", 1, &["afternoon".into()]),
        )
        .unwrap();

        let event = DoseEvent::new(123, noon(), "aspirin", "200mg", Segment::Afternoon);
        insert_dose_event(&conn, &event).unwrap();

        let rejection = verify_dose(&conn, &event).unwrap().unwrap();
        assert!(matches!(rejection, Rejection::AlreadyTaken { .. }));
        assert!(rejection.message().contains("already been taken"));
    }
}
