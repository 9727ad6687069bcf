use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text-generation client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ExtractionError>;
}

/// Vision client abstraction — prompt plus base64-encoded images.
pub trait VisionClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
    ) -> Result<String, ExtractionError>;
}

/// The two labeled sections of the label-photo OCR response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrCapture {
    /// Text under the "Extracted Text" anchor; empty when the anchor is
    /// absent.
    pub text: String,
    /// Count under the "Visible Pills Count" anchor; "unknown" when the
    /// anchor is absent.
    pub visible_pills: String,
}

/// A dose line shaped into a record: name, pill count, total dosage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseExtraction {
    /// Lowercased medication name.
    pub medicine_name: String,
    /// Pill count as text; "unknown" when the model's field was not
    /// numeric.
    pub pill_count: String,
    /// Total dosage as unit-bearing text; "unknown" when absent.
    pub medicine_dosage: String,
}

/// One medication row recognized on a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionExtraction {
    pub medication_name: String,
    pub dosage: String,
    pub frequency_per_day: u32,
    pub times_of_day: Vec<String>,
}
