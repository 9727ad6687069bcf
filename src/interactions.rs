//! Pairwise interaction screen for a candidate medication.
//!
//! Asks the text model, per currently prescribed medicine, whether the
//! pair is safe to take together under a strict yes/no protocol.
//! Advisory only — this never gates dose logging.

use crate::extraction::{ExtractionError, LlmClient};

/// Ask the model about each current medicine and collect the ones that
/// answered "no". Anything other than a clear "no" is treated as no
/// conflict.
pub fn find_conflicts(
    llm: &dyn LlmClient,
    model: &str,
    current: &[String],
    candidate: &str,
) -> Result<Vec<String>, ExtractionError> {
    let mut conflicting = Vec::new();

    for med in current {
        let prompt = format!(
            "I am currently taking {med}. If I now take {candidate}, \
             is it safe to take them together? \
             Only respond with 'yes' or 'no'. No other text."
        );
        let answer = llm.generate(model, &prompt, None)?;

        if answer.trim().to_lowercase() == "no" {
            tracing::warn!(
                existing = %med,
                candidate = %candidate,
                "Potential interaction flagged"
            );
            conflicting.push(med.clone());
        }
    }

    Ok(conflicting)
}
