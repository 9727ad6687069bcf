//! Prescription-upload pipeline.
//!
//! A simpler parallel path: captured photo → model extraction →
//! persist. `parse_prescription` never rejects a well-formed subset, so
//! an upload with some unparsable lines still stores the parsable ones.
//! All recognized entries commit together.

use std::sync::Arc;

use base64::Engine as _;
use chrono::NaiveDateTime;
use rusqlite::Connection;

use super::outcome::{ErrorKind, UploadOutcome};
use crate::db::{self, DatabaseError};
use crate::extraction::{self, ExtractionError, LlmClient, VisionClient};
use crate::models::PrescriptionEntry;

/// Orchestrates prescription uploads for one resolved user.
pub struct PrescriptionUpload {
    vision: Arc<dyn VisionClient>,
    llm: Arc<dyn LlmClient>,
    model_name: String,
    user_id: i64,
}

impl PrescriptionUpload {
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

    /// Run the upload pipeline for one captured prescription photo.
    pub fn upload(
        &self,
        conn: &mut Connection,
        image: &[u8],
        uploaded_at: NaiveDateTime,
    ) -> UploadOutcome {
        let _span = tracing::info_span!("upload_prescription", user_id = self.user_id).entered();

        let raw = match self.extract(image) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Prescription extraction failed");
                return UploadOutcome::rejected(ErrorKind::MalformedExtraction, e.to_string());
            }
        };

        let recognized = extraction::parse_prescription(&raw);
        tracing::info!(count = recognized.len(), "Prescription lines recognized");

        match self.persist(conn, &recognized, uploaded_at) {
            Ok(entries) => UploadOutcome::stored(entries),
            Err(e) => {
                tracing::error!(error = %e, "Prescription persistence failed");
                UploadOutcome::rejected(ErrorKind::DatabaseError, format!("Database error: {e}"))
            }
        }
    }

    /// Vision pass, then structuring pass into 4-field lines.
    fn extract(&self, image: &[u8]) -> Result<String, ExtractionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let ocr = self.vision.chat_with_images(
            &self.model_name,
            extraction::PRESCRIPTION_OCR_PROMPT,
            &[encoded],
            None,
        )?;
        self.llm.generate(
            &self.model_name,
            &extraction::build_prescription_structuring_prompt(&ocr),
            None,
        )
    }

    /// One insert per recognized entry, committed together.
    fn persist(
        &self,
        conn: &mut Connection,
        recognized: &[extraction::PrescriptionExtraction],
        uploaded_at: NaiveDateTime,
    ) -> Result<Vec<PrescriptionEntry>, DatabaseError> {
        let tx = conn.transaction()?;
        let mut entries = Vec::with_capacity(recognized.len());
        for med in recognized {
            let entry = PrescriptionEntry::new(
                self.user_id,
                uploaded_at,
                &med.medication_name,
                &med.dosage,
                med.frequency_per_day,
                &med.times_of_day,
            );
            db::insert_prescription(&tx, &entry)?;
            entries.push(entry);
        }
        tx.commit()?;
        Ok(entries)
    }
}
