//! Prompt templates for the two-call extraction flow: a vision pass that
//! reads the photo, then a structuring pass that shapes the raw text
//! into comma-delimited records the parser understands.

/// Vision pass for a medication label photo. The model is asked to keep
/// the extracted text and the visual pill count under separate anchors
/// that `split_ocr_response` locates afterwards.
pub const LABEL_OCR_PROMPT: &str = "\
Extract all the text from this image as accurately as possible.\n\n\
Then, separately:\n\n\
1. Count only the number of pills that are physically visible and outside of the bottle or packaging. \
Do not use numbers written on the label or packaging to estimate this. Only count what is actually visible in the image.\n\n\
2. Clearly separate the extracted text and the visual pill count. Format the output like this:\n\n\
---\n\
Extracted Text:\n\
[text here]\n\n\
Visible Pills Count:\n\
[number]";

/// Vision pass for a prescription photo: full text plus per-medication
/// details.
pub const PRESCRIPTION_OCR_PROMPT: &str = "\
Step 1: Extract all the text from this image of a prescription as accurately as possible. \
This includes medication names, dosages, instructions, and any additional labels or printed notes.\n\n\
Step 2: From the extracted text, identify and output the following details for each medication:\n\
- Medication name\n\
- Dosage (e.g., 500mg)\n\
- Frequency per day (e.g., 2 times a day)\n\
- Specific times of day to take it (e.g., morning, afternoon, night)";

/// Structuring pass: shape OCR text + pill count into the single
/// comma-delimited dose line `parse_dose` expects.
pub fn build_dose_structuring_prompt(ocr_text: &str, visible_pills: &str) -> String {
    format!(
        "You will be given:\n\
         - Text extracted from a medication label\n\
         - The number of pills physically counted outside the bottle\n\n\
         Your task is to extract:\n\
         1. The name of the medication (from text)\n\
         2. The number of visible pills (from pill count)\n\
         3. The total dosage (number of pills x dosage per pill)\n\n\
         Rules:\n\
         - Use only the provided pill count. Do not estimate from the label.\n\
         - If dosage per pill is not in the text, use 'unknown' for total dosage.\n\
         - Format: medication_name, number_of_pills, total_dosage_in_mg\n\n\
         Extracted Text:\n{ocr_text}\n\n\
         Visible Pill Count: {visible_pills}"
    )
}

/// Structuring pass: shape prescription OCR output into one 4-field
/// comma-delimited line per medication for `parse_prescription`.
pub fn build_prescription_structuring_prompt(raw_extraction: &str) -> String {
    format!(
        "Given the medication prescription information, return one line per medication in this format:\n\
         [Medication_name], [dosage], [frequency_per_day], [times_of_day].\n\
         Join multiple times of day with the word 'and'. \
         If times_of_day is unavailable, write Anytime.\n\n\
         Medication Prescription:\n{raw_extraction}"
    )
}
