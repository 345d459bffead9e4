use serde::{Deserialize, Serialize};

/// Provenance of a [`MedicineDetails`] result, shown to the user next to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    DatabaseAiEnhanced,
    AiGenerated,
    DatabaseOnly,
    AiUnavailable,
    AiFailed,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::DatabaseAiEnhanced => "database_ai_enhanced",
            Source::AiGenerated => "ai_generated",
            Source::DatabaseOnly => "database_only",
            Source::AiUnavailable => "ai_unavailable",
            Source::AiFailed => "ai_failed",
        }
    }
}

/// A medicine as held by the record store. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub name: String,
    pub composition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

/// The user-visible result unit. Textual fields are never empty: anything the
/// pipeline could not determine carries the locale's "not available" text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDetails {
    pub id: String,
    pub name: String,
    pub composition: String,
    pub usage: String,
    pub manufacturer: String,
    pub dosage: String,
    pub side_effects: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeStatus {
    Enhanced,
    Unavailable,
    Failed,
    OriginalUsed,
}

/// Search term produced by the query normalizer. `term` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTerm {
    pub term: String,
    pub status: NormalizeStatus,
}

impl NormalizedTerm {
    pub fn original(query: &str, status: NormalizeStatus) -> Self {
        Self {
            term: query.to_string(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_as_snake_case_tag() {
        let json = serde_json::to_string(&Source::DatabaseAiEnhanced).unwrap();
        assert_eq!(json, r#""database_ai_enhanced""#);
        for source in [
            Source::DatabaseAiEnhanced,
            Source::AiGenerated,
            Source::DatabaseOnly,
            Source::AiUnavailable,
            Source::AiFailed,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json.trim_matches('"'), source.as_str());
        }
    }

    #[test]
    fn details_serialize_camel_case_and_skip_missing_barcode() {
        let details = MedicineDetails {
            id: "3".into(),
            name: "Dolo 650".into(),
            composition: "Paracetamol 650mg".into(),
            usage: "Fever".into(),
            manufacturer: "Micro Labs".into(),
            dosage: "1 tablet".into(),
            side_effects: "Nausea".into(),
            barcode: None,
            source: Source::DatabaseAiEnhanced,
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["sideEffects"], "Nausea");
        assert_eq!(value["source"], "database_ai_enhanced");
        assert!(value.get("barcode").is_none());
    }

    #[test]
    fn stored_record_barcode_is_optional() {
        let record: StoredRecord =
            serde_json::from_str(r#"{"id":"1","name":"Crocin","composition":"Paracetamol"}"#)
                .unwrap();
        assert_eq!(record.barcode, None);
    }
}
