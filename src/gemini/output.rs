use serde::de::DeserializeOwned;
use tracing::warn;

use super::client::GeminiError;
use super::types::GenerateContentResponse;

/// Returns the first non-empty text part of the first candidate.
pub fn extract_text(response: &GenerateContentResponse) -> Option<&str> {
    let candidate = response.candidates.as_ref().and_then(|c| c.first());

    let text = candidate
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.first())
        .map(|part| part.text.as_str())
        .filter(|text| !text.trim().is_empty());

    if text.is_none() {
        let reason = candidate.and_then(|c| c.finish_reason.as_deref());
        warn!(
            finish_reason = reason.unwrap_or("none"),
            "Gemini returned empty answer (safety filter or empty response)"
        );
    }
    text
}

/// Parses the structured JSON answer of a `generateContent` call.
pub fn parse_structured<T: DeserializeOwned>(
    response: &GenerateContentResponse,
) -> Result<T, GeminiError> {
    let text = extract_text(response)
        .ok_or_else(|| GeminiError::MalformedOutput("no candidate text".to_string()))?;
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GeminiError::MalformedOutput(e.to_string()))
}

/// Models occasionally wrap JSON mode output in a Markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
