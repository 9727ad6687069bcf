//! Defensive parsers for model output.
//!
//! Model responses are natural language with no bit-exact contract, so
//! every parser here degrades field-by-field instead of failing whole
//! records: unparsable numeric fields become "unknown", unparsable
//! prescription lines are skipped, and a missing OCR anchor yields a
//! default rather than an error. Only a dose line that cannot be shaped
//! at all becomes a `ParseFailure` — and it carries the raw text so the
//! failure is reported, never silently dropped.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::types::{DoseExtraction, OcrCapture, PrescriptionExtraction};

/// Placeholder for a field the model could not supply in usable form.
pub const UNKNOWN_FIELD: &str = "unknown";

/// A dose line that could not be shaped into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed dose extraction: {reason}")]
pub struct ParseFailure {
    pub reason: String,
    /// The model's raw text, preserved for reporting.
    pub raw: String,
}

impl ParseFailure {
    fn new(reason: &str, raw: &str) -> Self {
        Self {
            reason: reason.to_string(),
            raw: raw.to_string(),
        }
    }
}

/// Regex anchors for the OCR response sections (compiled once via LazyLock).
static RE_PILLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Visible Pills Count:\s*(\d+)").unwrap());
static RE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Extracted Text:\s*(.*?)\n\s*\n\s*Visible Pills Count:").unwrap()
});

/// Locate the "Extracted Text" and "Visible Pills Count" sections of the
/// combined OCR response. Absence of either anchor yields its default
/// (empty text / "unknown" count), never an error.
pub fn split_ocr_response(response: &str) -> OcrCapture {
    let visible_pills = RE_PILLS
        .captures(response)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    let text = RE_TEXT
        .captures(response)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    OcrCapture {
        text,
        visible_pills,
    }
}

/// Parse the structuring model's dose line: exactly 3 comma-delimited
/// fields (name, pill count, dosage). The name is lower-cased; numeric
/// fields that fail to parse degrade to "unknown" rather than failing
/// the record.
pub fn parse_dose(text: &str) -> Result<DoseExtraction, ParseFailure> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::new("empty response", text));
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ParseFailure::new(
            &format!("expected 3 comma-delimited fields, got {}", parts.len()),
            text,
        ));
    }

    let name = parts[0].to_lowercase();
    if name.is_empty() {
        return Err(ParseFailure::new("empty medicine name", text));
    }

    Ok(DoseExtraction {
        medicine_name: name,
        pill_count: normalize_count(parts[1]),
        medicine_dosage: normalize_dosage(parts[2]),
    })
}

/// Parse the structuring model's prescription output: one 4-field line
/// per medication. Lines that do not split into exactly 4 fields are
/// skipped — extraction is best-effort over multiple candidates, and one
/// bad line must not invalidate the rest.
pub fn parse_prescription(text: &str) -> Vec<PrescriptionExtraction> {
    let mut medications = Vec::new();

    for line in text.lines() {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            if !line.trim().is_empty() {
                tracing::debug!(line = %line.trim(), "Skipping unparsable prescription line");
            }
            continue;
        }

        let (name, dosage, freq, times) = (parts[0], parts[1], parts[2], parts[3]);
        if name.is_empty() {
            continue;
        }

        medications.push(PrescriptionExtraction {
            medication_name: name.to_string(),
            dosage: dosage.to_string(),
            frequency_per_day: freq.parse().unwrap_or(0),
            times_of_day: split_times(times),
        });
    }

    medications
}

/// Split a time-of-day list joined by the literal word "and".
fn split_times(times: &str) -> Vec<String> {
    times
        .split("and")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Pill counts must be whole numbers; anything else degrades to
/// "unknown".
fn normalize_count(raw: &str) -> String {
    if raw.parse::<u32>().is_ok() {
        raw.to_string()
    } else {
        UNKNOWN_FIELD.to_string()
    }
}

/// Dosage is unit-bearing text ("200mg"); keep it verbatim as long as it
/// carries a number.
fn normalize_dosage(raw: &str) -> String {
    if raw.chars().any(|c| c.is_ascii_digit()) {
        raw.to_string()
    } else {
        UNKNOWN_FIELD.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── split_ocr_response ──

    #[test]
    fn split_finds_both_sections() {
        let response = "---\nExtracted Text:\nAspirin 200mg\n30 tablets\n\nVisible Pills Count:\n2";
        let capture = split_ocr_response(response);
        assert_eq!(capture.text, "Aspirin 200mg\n30 tablets");
        assert_eq!(capture.visible_pills, "2");
    }

    #[test]
    fn split_missing_pill_anchor_defaults_unknown() {
        let capture = split_ocr_response("Extracted Text:\nAspirin 200mg");
        assert_eq!(capture.visible_pills, "unknown");
        assert_eq!(capture.text, "");
    }

    #[test]
    fn split_missing_text_anchor_defaults_empty() {
        let capture = split_ocr_response("Visible Pills Count:\n7");
        assert_eq!(capture.text, "");
        assert_eq!(capture.visible_pills, "7");
    }

    #[test]
    fn split_empty_response_never_crashes() {
        let capture = split_ocr_response("");
        assert_eq!(capture.text, "");
        assert_eq!(capture.visible_pills, "unknown");
    }

    // ── parse_dose ──

    #[test]
    fn parse_dose_three_fields() {
        let dose = parse_dose("Aspirin, 2, 200mg").unwrap();
        assert_eq!(dose.medicine_name, "aspirin");
        assert_eq!(dose.pill_count, "2");
        assert_eq!(dose.medicine_dosage, "200mg");
    }

    #[test]
    fn parse_dose_two_fields_is_failure() {
        let err = parse_dose("Aspirin, 2").unwrap_err();
        assert!(err.reason.contains("got 2"));
        assert_eq!(err.raw, "Aspirin, 2");
    }

    #[test]
    fn parse_dose_four_fields_is_failure() {
        assert!(parse_dose("Aspirin, 2, 200mg, extra").is_err());
    }

    #[test]
    fn parse_dose_non_numeric_count_degrades() {
        let dose = parse_dose("Aspirin, several, 200mg").unwrap();
        assert_eq!(dose.pill_count, "unknown");
        assert_eq!(dose.medicine_dosage, "200mg");
    }

    #[test]
    fn parse_dose_unknown_dosage_preserved() {
        let dose = parse_dose("Aspirin, 2, unknown").unwrap();
        assert_eq!(dose.medicine_dosage, "unknown");
    }

    #[test]
    fn parse_dose_empty_response_is_failure() {
        assert!(parse_dose("").is_err());
        assert!(parse_dose("   \n").is_err());
    }

    #[test]
    fn parse_dose_tolerates_surrounding_whitespace() {
        let dose = parse_dose("  Metformin ,  2 ,  1000mg \n").unwrap();
        assert_eq!(dose.medicine_name, "metformin");
        assert_eq!(dose.pill_count, "2");
        assert_eq!(dose.medicine_dosage, "1000mg");
    }

    // ── parse_prescription ──

    #[test]
    fn parse_prescription_skips_bad_lines() {
        let text = "Metformin, 500mg, 2, morning and night\nbadline\nLisinopril, 10mg, 1, morning";
        let meds = parse_prescription(text);
        assert_eq!(meds.len(), 2);
        assert_eq!(meds[0].medication_name, "Metformin");
        assert_eq!(meds[0].times_of_day, vec!["morning", "night"]);
        assert_eq!(meds[1].times_of_day, vec!["morning"]);
    }

    #[test]
    fn parse_prescription_bad_frequency_defaults_zero() {
        let meds = parse_prescription("Metformin, 500mg, twice, morning");
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].frequency_per_day, 0);
    }

    #[test]
    fn parse_prescription_empty_input() {
        assert!(parse_prescription("").is_empty());
        assert!(parse_prescription("\n\n").is_empty());
    }

    #[test]
    fn parse_prescription_single_time_token() {
        let meds = parse_prescription("Lisinopril, 10mg, 1, Anytime");
        assert_eq!(meds[0].times_of_day, vec!["Anytime"]);
    }

    #[test]
    fn parse_prescription_three_way_and() {
        let meds = parse_prescription("Amoxicillin, 250mg, 3, morning and afternoon and night");
        assert_eq!(
            meds[0].times_of_day,
            vec!["morning", "afternoon", "night"]
        );
    }
}
