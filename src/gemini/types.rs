use serde::{Deserialize, Serialize};

use crate::locale::Language;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: serde_json::Value,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

/// Error envelope returned by the Generative Language API.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
    /// Canonical status name, e.g. `PERMISSION_DENIED` or `RESOURCE_EXHAUSTED`.
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable reason, e.g. `API_KEY_INVALID`.
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NormalizeInput {
    pub query: String,
}

/// Source tag the model reports for a normalized query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NormalizeTag {
    AiEnhanced,
    OriginalQuery,
    Other(String),
}

impl From<String> for NormalizeTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ai_enhanced" => NormalizeTag::AiEnhanced,
            "original_query" => NormalizeTag::OriginalQuery,
            _ => NormalizeTag::Other(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOutput {
    #[serde(default)]
    pub corrected_medicine_name: Option<String>,
    #[serde(default)]
    pub source: Option<NormalizeTag>,
}

#[derive(Debug, Clone)]
pub struct SynthesizeInput {
    pub search_term_or_name: String,
    pub language: Language,
    pub context_name: Option<String>,
    pub context_composition: Option<String>,
    pub context_barcode: Option<String>,
}

/// Source tag the model reports for a synthesized record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SynthesisTag {
    DatabaseAiEnhanced,
    AiGenerated,
    Other(String),
}

impl From<String> for SynthesisTag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "database_ai_enhanced" => SynthesisTag::DatabaseAiEnhanced,
            "ai_generated" => SynthesisTag::AiGenerated,
            _ => SynthesisTag::Other(s),
        }
    }
}

/// Structured synthesis output. Every field is optional so that partially filled
/// answers still parse; gaps are handled by the synthesizer's fallback table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesizeOutput {
    pub name: Option<String>,
    pub composition: Option<String>,
    pub usage: Option<String>,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub side_effects: Option<String>,
    pub barcode: Option<String>,
    pub source: Option<SynthesisTag>,
}
