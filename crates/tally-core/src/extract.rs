//! Structured Field Extractor
//!
//! Sends canonical document text to the text-generation service with a
//! fixed-schema prompt and parses the single JSON object embedded in the
//! response. Model output often wraps the JSON in extra prose, so parsing
//! scans for the first balanced `{...}` substring; anything less than one
//! valid JSON object is an `ExtractionParse` failure with no partial
//! recovery.

use tracing::debug;

use crate::ai::{AIClient, TextGenBackend};
use crate::error::{Error, Result};
use crate::models::RawFieldMap;
use crate::normalize::{BUSINESS_FIELDS, PERSONAL_FIELDS};

/// Default character budget for text sent to the generation service.
///
/// Documents are assumed front-loaded with the most relevant data, so
/// truncation keeps the prefix.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Extracts a raw field map from canonical document text.
pub struct FieldExtractor {
    client: AIClient,
    max_chars: usize,
}

impl FieldExtractor {
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Override the character budget
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Extract a raw field map from canonical text.
    ///
    /// The result is untyped on purpose: field values may be strings with
    /// currency symbols, numbers, or null, and repairing them is the value
    /// normalizer's job.
    pub async fn extract(&self, text: &str) -> Result<RawFieldMap> {
        let truncated = truncate_chars(text, self.max_chars);
        let prompt = build_prompt(truncated);

        debug!(
            model = self.client.model(),
            chars = truncated.len(),
            "Requesting field extraction"
        );

        let response = self.client.generate(&prompt).await?;
        parse_field_map(&response)
    }
}

/// Truncate to at most `max_chars` characters, keeping the prefix.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Fixed-schema prompt naming every canonical field.
fn build_prompt(text: &str) -> String {
    let personal = PERSONAL_FIELDS.join(", ");
    let business = BUSINESS_FIELDS.join(", ");
    format!(
        "You are a financial data extraction assistant. Extract financial figures \
         from the document below.\n\n\
         Respond with a single JSON object and nothing else. Use these keys where \
         the document provides a value, and omit keys the document does not cover.\n\
         Personal fields: {personal}\n\
         Business fields: {business}\n\
         Values may be plain numbers or strings as they appear in the document.\n\n\
         Document:\n{text}"
    )
}

/// Parse the first balanced JSON object out of a model response.
pub fn parse_field_map(response: &str) -> Result<RawFieldMap> {
    let response = response.trim();

    let json_str = first_json_object(response).ok_or_else(|| {
        Error::ExtractionParse(format!(
            "No JSON found in extraction response | Raw: {}",
            truncate_for_error(response)
        ))
    })?;

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        Error::ExtractionParse(format!(
            "Invalid JSON from extraction service: {} | Raw: {}",
            e,
            truncate_for_error(json_str)
        ))
    })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(Error::ExtractionParse(format!(
            "Extraction response is not an object: {}",
            other
        ))),
    }
}

/// Find the first balanced `{...}` substring by matching braces.
fn first_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let mut depth = 0;

    for (i, c) in response[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Truncate long responses for error messages
fn truncate_for_error(s: &str) -> String {
    if s.len() > 200 {
        let cut = s
            .char_indices()
            .nth(200)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}
