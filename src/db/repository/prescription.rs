use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::PrescriptionEntry;

pub fn insert_prescription(
    conn: &Connection,
    entry: &PrescriptionEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions
         (id, user_id, upload_time, medicine_name, medicine_dosage, times_per_day, time_of_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id.to_string(),
            entry.user_id,
            entry.upload_time,
            entry.medicine_name,
            entry.medicine_dosage,
            entry.times_per_day,
            entry.time_of_day,
        ],
    )?;
    Ok(())
}

pub fn list_prescriptions(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<PrescriptionEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, upload_time, medicine_name, medicine_dosage, times_per_day, time_of_day
         FROM prescriptions WHERE user_id = ?1 ORDER BY medicine_name, upload_time",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, NaiveDateTime>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, u32>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, user_id, upload_time, name, dosage, times_per_day, time_of_day) = row?;
        entries.push(PrescriptionEntry {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            user_id,
            upload_time,
            medicine_name: name,
            medicine_dosage: dosage,
            times_per_day,
            time_of_day,
        });
    }
    Ok(entries)
}

/// Time-of-day tokens per prescribed medicine, keyed by lowercase name.
///
/// Flattens each row's comma-separated time string into discrete tokens,
/// so a medicine prescribed "morning, night" yields two entries.
pub fn prescribed_times(
    conn: &Connection,
    user_id: i64,
) -> Result<HashMap<String, Vec<String>>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medicine_name, time_of_day FROM prescriptions
         WHERE user_id = ?1 ORDER BY medicine_name, time_of_day",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (name, times) = row?;
        map.entry(name.to_lowercase()).or_default().extend(
            times
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
        );
    }
    Ok(map)
}

/// Number of distinct medicines in the user's prescriptions.
pub fn active_medicine_count(conn: &Connection, user_id: i64) -> Result<i64, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(DISTINCT medicine_name) FROM prescriptions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn noon() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn insert_and_list_round_trip() {
        let conn = open_memory_database().unwrap();
        let entry = PrescriptionEntry::new(
            123,
            noon(),
            "Metformin",
            "500mg",
            2,
            &["morning".into(), "night".into()],
        );
        insert_prescription(&conn, &entry).unwrap();

        let listed = list_prescriptions(&conn, 123).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, entry.id);
        assert_eq!(listed[0].medicine_name, "metformin");
        assert_eq!(listed[0].times_per_day, 2);
        assert_eq!(listed[0].time_of_day, "morning, night");
    }

    #[test]
    fn list_is_scoped_to_user() {
        let conn = open_memory_database().unwrap();
        let entry = PrescriptionEntry::new(1, noon(), "aspirin", "100mg", 1, &["morning".into()]);
        insert_prescription(&conn, &entry).unwrap();
        assert!(list_prescriptions(&conn, 2).unwrap().is_empty());
    }

    #[test]
    fn prescribed_times_flattens_tokens() {
        let conn = open_memory_database().unwrap();
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(
                123,
                noon(),
                "Metformin",
                "500mg",
                2,
                &["morning".into(), "night".into()],
            ),
        )
        .unwrap();
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(123, noon(), "Lisinopril", "10mg", 1, &["morning".into()]),
        )
        .unwrap();

        let map = prescribed_times(&conn, 123).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["metformin"], vec!["morning", "night"]);
        assert_eq!(map["lisinopril"], vec!["morning"]);
    }

    #[test]
    fn active_medicine_count_is_distinct() {
        let conn = open_memory_database().unwrap();
        // Same medicine uploaded twice counts once
        for _ in 0..2 {
            insert_prescription(
                &conn,
                &PrescriptionEntry::new(123, noon(), "aspirin", "100mg", 1, &["morning".into()]),
            )
            .unwrap();
        }
        insert_prescription(
            &conn,
            &PrescriptionEntry::new(123, noon(), "metformin", "500mg", 2, &["night".into()]),
        )
        .unwrap();

        assert_eq!(active_medicine_count(&conn, 123).unwrap(), 2);
        assert_eq!(active_medicine_count(&conn, 999).unwrap(), 0);
    }
}
