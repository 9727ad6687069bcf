use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, ToSql};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{DoseEvent, Segment};

/// Insert a verified dose into the append-only log.
///
/// The log's UNIQUE constraint on (user_id, day, time_of_day,
/// medicine_name) is the authoritative duplicate guard; a violation
/// surfaces as `ConstraintViolation` for the caller to translate.
pub fn insert_dose_event(conn: &Connection, event: &DoseEvent) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO dose_log
         (id, user_id, log_time, medicine_name, medicine_dosage, day, time_of_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.id.to_string(),
            event.user_id,
            event.log_time,
            event.medicine_name,
            event.medicine_dosage,
            event.day,
            event.time_of_day.as_str(),
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, msg)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(
                msg.unwrap_or_else(|| "duplicate dose".to_string()),
            )
        }
        other => DatabaseError::Sqlite(other),
    })?;
    Ok(())
}

/// Whether a dose is already logged for this (day, window, medicine).
///
/// Pure read against the same table `insert_dose_event` writes to.
pub fn has_dose_logged(
    conn: &Connection,
    user_id: i64,
    day: NaiveDate,
    time_of_day: Segment,
    medicine_name: &str,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM dose_log
         WHERE user_id = ?1 AND day = ?2 AND time_of_day = ?3
           AND LOWER(medicine_name) = LOWER(?4)",
        params![user_id, day, time_of_day.as_str(), medicine_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Dose history for a user, optionally narrowed by day, window, or medicine.
pub fn list_dose_events(
    conn: &Connection,
    user_id: i64,
    day: Option<NaiveDate>,
    time_of_day: Option<Segment>,
    medicine_name: Option<&str>,
) -> Result<Vec<DoseEvent>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, user_id, log_time, medicine_name, medicine_dosage, day, time_of_day
         FROM dose_log WHERE user_id = ?1",
    );
    let mut bind: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

    if let Some(day) = day {
        bind.push(Box::new(day));
        sql.push_str(&format!(" AND day = ?{}", bind.len()));
    }
    if let Some(segment) = time_of_day {
        bind.push(Box::new(segment.as_str()));
        sql.push_str(&format!(" AND time_of_day = ?{}", bind.len()));
    }
    if let Some(name) = medicine_name {
        bind.push(Box::new(name.to_lowercase()));
        sql.push_str(&format!(" AND LOWER(medicine_name) = ?{}", bind.len()));
    }
    sql.push_str(" ORDER BY log_time");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(bind.iter().map(|p| p.as_ref())),
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, NaiveDateTime>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, NaiveDate>(5)?,
                row.get::<_, String>(6)?,
            ))
        },
    )?;

    let mut events = Vec::new();
    for row in rows {
        let (id, user_id, log_time, name, dosage, day, segment) = row?;
        events.push(DoseEvent {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            user_id,
            log_time,
            medicine_name: name,
            medicine_dosage: dosage,
            day,
            time_of_day: Segment::from_str(&segment)?,
        });
    }
    Ok(events)
}

/// Distinct medicines taken per day, oldest day first.
pub fn daily_taken_counts(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<(NaiveDate, i64)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT day, COUNT(DISTINCT medicine_name) FROM dose_log
         WHERE user_id = ?1 GROUP BY day ORDER BY day",
    )?;
    let rows = stmt.query_map(params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Distinct medicines the user logged on the given day.
pub fn taken_on(conn: &Connection, user_id: i64, day: NaiveDate) -> Result<i64, DatabaseError> {
    conn.query_row(
        "SELECT COUNT(DISTINCT medicine_name) FROM dose_log WHERE user_id = ?1 AND day = ?2",
        params![user_id, day],
        |row| row.get(0),
    )
    .map_err(DatabaseError::from)
}
