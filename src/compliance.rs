//! Adherence aggregates over the dose log.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};

/// Expected-vs-taken counts for one day of history. Derived, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSample {
    pub day: NaiveDate,
    pub expected_count: i64,
    pub taken_count: i64,
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub user_id: i64,
    pub active_prescriptions: i64,
    pub taken_today: i64,
}

/// Per-day breakdown: distinct medicines taken that day vs the
/// distinct-medicine count of the user's prescriptions.
pub fn daily_samples(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<ComplianceSample>, DatabaseError> {
    let expected = db::active_medicine_count(conn, user_id)?;
    let counts = db::daily_taken_counts(conn, user_id)?;
    Ok(counts
        .into_iter()
        .map(|(day, taken)| ComplianceSample {
            day,
            expected_count: expected,
            taken_count: taken,
        })
        .collect())
}

/// Overall compliance for a user, in [0, 1].
pub fn compliance_rate(conn: &Connection, user_id: i64) -> Result<f64, DatabaseError> {
    Ok(rate_from_samples(&daily_samples(conn, user_id)?))
}

/// Ratio of sums: sum(taken) / sum(expected) across days, so days with
/// more prescribed medicines weigh proportionally more (this is not the
/// mean of per-day ratios). Days with expected == 0 contribute nothing
/// to either sum; an empty denominator yields 0.0 rather than failing.
pub fn rate_from_samples(samples: &[ComplianceSample]) -> f64 {
    let (taken, expected) = samples
        .iter()
        .filter(|s| s.expected_count > 0)
        .fold((0i64, 0i64), |(t, e), s| {
            (t + s.taken_count, e + s.expected_count)
        });

    if expected == 0 {
        return 0.0;
    }
    taken as f64 / expected as f64
}

/// Active-prescription and taken-today counts in one fetch.
pub fn dashboard_summary(
    conn: &Connection,
    user_id: i64,
    today: NaiveDate,
) -> Result<DashboardSummary, DatabaseError> {
    Ok(DashboardSummary {
        user_id,
        active_prescriptions: db::active_medicine_count(conn, user_id)?,
        taken_today: db::taken_on(conn, user_id, today)?,
    })
}
