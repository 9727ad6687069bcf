//! Dose-logging pipeline.
//!
//! A sequential state machine: captured photo → model extraction →
//! time-window classification → regimen verification → persist, with a
//! terminal rejection reachable after classification. The duplicate
//! check and the insert run inside one transaction; the dose log's
//! UNIQUE constraint is the authoritative duplicate guard.

use std::sync::Arc;

use base64::Engine as _;
use chrono::NaiveDateTime;
use rusqlite::Connection;

use super::outcome::{ErrorKind, LogOutcome};
use crate::db::{self, DatabaseError};
use crate::extraction::{
    self, DoseExtraction, ExtractionError, LlmClient, OcrCapture, ParseFailure, VisionClient,
};
use crate::models::DoseEvent;
use crate::schedule;
use crate::verify::{self, Rejection};

/// Orchestrates dose logging for one resolved user.
pub struct DoseIngestion {
    vision: Arc<dyn VisionClient>,
    llm: Arc<dyn LlmClient>,
    model_name: String,
    user_id: i64,
}

/// Internal failure funnel; translated into `LogOutcome` in one place.
enum IngestFailure {
    Extraction(ExtractionError),
    Parse(ParseFailure),
    Rejected(Rejection),
    Database(DatabaseError),
}

impl From<ExtractionError> for IngestFailure {
    fn from(e: ExtractionError) -> Self {
        Self::Extraction(e)
    }
}

impl From<ParseFailure> for IngestFailure {
    fn from(e: ParseFailure) -> Self {
        Self::Parse(e)
    }
}

impl From<DatabaseError> for IngestFailure {
    fn from(e: DatabaseError) -> Self {
        Self::Database(e)
    }
}

impl DoseIngestion {
    pub fn new(
        vision: Arc<dyn VisionClient>,
        llm: Arc<dyn LlmClient>,
        model_name: &str,
        user_id: i64,
    ) -> Self {
        Self {
            vision,
            llm,
            model_name: model_name.to_string(),
            user_id,
        }
    }

    /// Run the full pipeline for one captured label photo.
    ///
    /// `captured_at` is the already-localized capture timestamp; the
    /// event's day and time window derive from it.
    pub fn log_dose(
        &self,
        conn: &mut Connection,
        image: &[u8],
        captured_at: NaiveDateTime,
    ) -> LogOutcome {
        let _span = tracing::info_span!("log_dose", user_id = self.user_id).entered();

        match self.try_log_dose(conn, image, captured_at) {
            Ok(event) => {
                tracing::info!(
                    medicine = %event.medicine_name,
                    window = %event.time_of_day,
                    day = %event.day,
                    "Dose logged"
                );
                LogOutcome::logged(event)
            }
            Err(IngestFailure::Rejected(rejection)) => {
                let kind = match &rejection {
                    Rejection::NotPrescribed { .. } => ErrorKind::NotPrescribed,
                    Rejection::AlreadyTaken { .. } => ErrorKind::AlreadyTaken,
                };
                tracing::info!(kind = kind.as_str(), "Dose rejected");
                LogOutcome::rejected(kind, rejection.message())
            }
            Err(IngestFailure::Extraction(e)) => {
                // Transport failures and timeouts are transient: the caller
                // may retry with the same photo.
                tracing::warn!(error = %e, "Extraction failed");
                LogOutcome::rejected(ErrorKind::MalformedExtraction, e.to_string())
            }
            Err(IngestFailure::Parse(e)) => {
                tracing::warn!(raw = %e.raw, "Model output unparsable");
                LogOutcome::rejected(ErrorKind::MalformedExtraction, e.to_string())
            }
            Err(IngestFailure::Database(e)) => {
                // No automatic retry: a dose write has no idempotency key,
                // so a blind retry risks double-logging.
                tracing::error!(error = %e, "Dose persistence failed");
                LogOutcome::rejected(ErrorKind::DatabaseError, format!("Database error: {e}"))
            }
        }
    }

    fn try_log_dose(
        &self,
        conn: &mut Connection,
        image: &[u8],
        captured_at: NaiveDateTime,
    ) -> Result<DoseEvent, IngestFailure> {
        // CAPTURED → EXTRACTED: vision pass, then structuring pass
        let capture = self.read_label(image)?;
        let extraction = self.structure_dose(&capture)?;

        // EXTRACTED → CLASSIFIED
        let time_of_day = schedule::classify(captured_at);
        let event = DoseEvent::new(
            self.user_id,
            captured_at,
            &extraction.medicine_name,
            &extraction.medicine_dosage,
            time_of_day,
        );

        // CLASSIFIED → VERIFIED → PERSISTED, under one transaction so the
        // duplicate read and the insert are a single logical step.
        let tx = conn.transaction().map_err(DatabaseError::from)?;
        if let Some(rejection) = verify::verify_dose(&tx, &event)? {
            return Err(IngestFailure::Rejected(rejection));
        }
        match db::insert_dose_event(&tx, &event) {
            Ok(()) => {}
            Err(DatabaseError::ConstraintViolation(_)) => {
                // The UNIQUE constraint caught a race the in-memory gate
                // missed; report it as the same rejection.
                return Err(IngestFailure::Rejected(Rejection::AlreadyTaken {
                    medicine_name: event.medicine_name.clone(),
                    day: event.day,
                    time_of_day: event.time_of_day,
                }));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().map_err(DatabaseError::from)?;

        Ok(event)
    }

    /// Vision pass: photo → raw text + visible-pill count.
    fn read_label(&self, image: &[u8]) -> Result<OcrCapture, ExtractionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let raw = self.vision.chat_with_images(
            &self.model_name,
            extraction::LABEL_OCR_PROMPT,
            &[encoded],
            None,
        )?;
        Ok(extraction::split_ocr_response(&raw))
    }

    /// Structuring pass: OCR sections → 3-field dose line → record.
    fn structure_dose(&self, capture: &OcrCapture) -> Result<DoseExtraction, IngestFailure> {
        let prompt =
            extraction::build_dose_structuring_prompt(&capture.text, &capture.visible_pills);
        let line = self.llm.generate(&self.model_name, &prompt, None)?;
        Ok(extraction::parse_dose(&line)?)
    }
}
