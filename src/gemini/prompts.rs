//! Prompts and response schemas for the two structured model calls.

use serde_json::{Value, json};

use super::types::{NormalizeInput, SynthesizeInput};

pub fn normalize_prompt(input: &NormalizeInput) -> String {
    format!(
        r#"You help users of a medicine lookup app find the medicine they mean.

The user typed: "{query}"

The text may be misspelled, abbreviated, a brand name, a barcode, or an active ingredient.
Work out the single most likely identifier to search a medicine database with:
- a corrected brand or generic medicine name (e.g. "dolo650" -> "Dolo 650"),
- the barcode exactly as typed when the input is a barcode,
- or the main composition keyword when the input names an ingredient.

Set "correctedMedicineName" to that identifier. It must not be empty.
Set "source" to "ai_enhanced" when you changed or inferred the term, or "original_query"
when the user's text is already the best search term."#,
        query = input.query
    )
}

pub fn normalize_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "correctedMedicineName": { "type": "STRING" },
            "source": { "type": "STRING", "enum": ["ai_enhanced", "original_query"] }
        },
        "required": ["correctedMedicineName"]
    })
}

pub fn synthesize_prompt(input: &SynthesizeInput) -> String {
    let lang = input.language.display_name();
    match (&input.context_name, &input.context_composition) {
        (Some(name), Some(composition)) => {
            let barcode = input.context_barcode.as_deref().unwrap_or("unknown");
            format!(
                r#"You are a pharmacist writing reference notes for a medicine that is already in our database.

Database record:
- name: "{name}"
- composition: "{composition}"
- barcode: "{barcode}"

Return "name" and "composition" exactly as given above, without any change.
Fill in "usage", "manufacturer", "dosage" and "sideEffects" with short, factual text in {lang}.
Leave a field empty if you do not know it; do not guess a manufacturer.
Set "source" to "database_ai_enhanced"."#
            )
        }
        _ => format!(
            r#"You are a pharmacist writing reference notes for a medicine that is not in our database.

The user searched for: "{term}"

Identify the medicine. Set "name" to its common name and "composition" to its active
ingredients with strengths. Fill in "usage", "manufacturer", "dosage" and "sideEffects" with
short, factual text in {lang}. If you cannot identify a real medicine, leave "name" and
"composition" empty.
Set "source" to "ai_generated"."#,
            term = input.search_term_or_name
        ),
    }
}

pub fn synthesize_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "composition": { "type": "STRING" },
            "usage": { "type": "STRING" },
            "manufacturer": { "type": "STRING" },
            "dosage": { "type": "STRING" },
            "sideEffects": { "type": "STRING" },
            "barcode": { "type": "STRING" },
            "source": { "type": "STRING", "enum": ["database_ai_enhanced", "ai_generated"] }
        },
        "required": ["name", "composition", "usage", "manufacturer", "dosage", "sideEffects", "source"]
    })
}
