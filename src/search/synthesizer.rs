//! Produces complete medicine details, either around a known store record
//! (context mode) or from a bare search term (open mode).

use tracing::{debug, warn};

use super::AiFailure;
use crate::gemini::types::{SynthesisTag, SynthesizeInput, SynthesizeOutput};
use crate::gemini::{GeminiError, GenerativeBackend};
use crate::locale::{Language, StringTable, strings};
use crate::models::{MedicineDetails, Source, StoredRecord};

#[derive(Debug, Clone)]
pub enum SynthesisContext {
    /// No record matched; the model must identify the medicine itself.
    Open { search_term: String },
    /// A record matched; its name and composition are authoritative.
    Record(StoredRecord),
}

impl SynthesisContext {
    fn to_input(&self, language: Language) -> SynthesizeInput {
        match self {
            SynthesisContext::Open { search_term } => SynthesizeInput {
                search_term_or_name: search_term.clone(),
                language,
                context_name: None,
                context_composition: None,
                context_barcode: None,
            },
            SynthesisContext::Record(record) => SynthesizeInput {
                search_term_or_name: record.name.clone(),
                language,
                context_name: Some(record.name.clone()),
                context_composition: Some(record.composition.clone()),
                context_barcode: record.barcode.clone(),
            },
        }
    }
}

/// Single attempt at completing `context`. Never fails; errors become
/// labeled, placeholder-filled records.
pub async fn synthesize(
    backend: &impl GenerativeBackend,
    context: &SynthesisContext,
    language: Language,
) -> MedicineDetails {
    let outcome = backend.synthesize(&context.to_input(language)).await;
    let details = resolve(context, outcome, strings(language));
    debug!(name = %details.name, source = details.source.as_str(), "details synthesized");
    details
}

/// Decision table: (mode, model outcome) to the final record.
///
/// | mode    | outcome                                   | source                 |
/// |---------|-------------------------------------------|------------------------|
/// | record  | ok, tag database_ai_enhanced, new detail  | `database_ai_enhanced` |
/// | record  | ok, wrong tag or no new detail            | `database_only`        |
/// | record  | error                                     | `database_only`        |
/// | open    | ok, tag ai_generated, name+composition    | `ai_generated`         |
/// | open    | ok, wrong tag or missing identity         | `ai_failed`            |
/// | open    | configuration error                       | `ai_unavailable`       |
/// | open    | any other error                           | `ai_failed`            |
pub fn resolve(
    context: &SynthesisContext,
    outcome: Result<SynthesizeOutput, GeminiError>,
    text: &StringTable,
) -> MedicineDetails {
    match context {
        SynthesisContext::Record(record) => resolve_record(record, outcome, text),
        SynthesisContext::Open { search_term } => resolve_open(search_term, outcome, text),
    }
}

/// Store-only record: context values kept, every detail a placeholder.
pub fn database_only(record: &StoredRecord, text: &StringTable) -> MedicineDetails {
    MedicineDetails {
        id: record.id.clone(),
        name: or_placeholder(Some(&record.name), text),
        composition: or_placeholder(Some(&record.composition), text),
        usage: text.not_available.to_string(),
        manufacturer: text.not_available.to_string(),
        dosage: text.not_available.to_string(),
        side_effects: text.not_available.to_string(),
        barcode: non_empty(record.barcode.as_deref()),
        source: Source::DatabaseOnly,
    }
}

fn resolve_record(
    record: &StoredRecord,
    outcome: Result<SynthesizeOutput, GeminiError>,
    text: &StringTable,
) -> MedicineDetails {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            warn!(
                error = %e,
                failure = ?AiFailure::from(&e),
                record = %record.id,
                "detail synthesis failed, showing stored record only"
            );
            return database_only(record, text);
        }
    };

    if output.source != Some(SynthesisTag::DatabaseAiEnhanced) {
        warn!(record = %record.id, tag = ?output.source, "unexpected source tag for stored record");
        return database_only(record, text);
    }

    let added_detail = [
        &output.usage,
        &output.manufacturer,
        &output.dosage,
        &output.side_effects,
    ]
    .into_iter()
    .any(|field| non_empty(field.as_deref()).is_some());
    if !added_detail {
        debug!(record = %record.id, "model echoed context without new details");
        return database_only(record, text);
    }

    MedicineDetails {
        source: Source::DatabaseAiEnhanced,
        usage: or_placeholder(output.usage.as_deref(), text),
        manufacturer: or_placeholder(output.manufacturer.as_deref(), text),
        dosage: or_placeholder(output.dosage.as_deref(), text),
        side_effects: or_placeholder(output.side_effects.as_deref(), text),
        ..database_only(record, text)
    }
}

fn resolve_open(
    search_term: &str,
    outcome: Result<SynthesizeOutput, GeminiError>,
    text: &StringTable,
) -> MedicineDetails {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            let source = match AiFailure::from(&e) {
                AiFailure::Unavailable => Source::AiUnavailable,
                AiFailure::Failed => Source::AiFailed,
            };
            warn!(error = %e, source = source.as_str(), "detail synthesis failed");
            return placeholder_record(search_term, source, text);
        }
    };

    let name = non_empty(output.name.as_deref());
    let composition = non_empty(output.composition.as_deref());
    let (Some(name), Some(composition), Some(SynthesisTag::AiGenerated)) =
        (name, composition, &output.source)
    else {
        warn!(search_term, tag = ?output.source, "model could not identify the medicine");
        return placeholder_record(search_term, Source::AiFailed, text);
    };

    MedicineDetails {
        id: synthetic_id(search_term),
        name,
        composition,
        usage: or_placeholder(output.usage.as_deref(), text),
        manufacturer: or_placeholder(output.manufacturer.as_deref(), text),
        dosage: or_placeholder(output.dosage.as_deref(), text),
        side_effects: or_placeholder(output.side_effects.as_deref(), text),
        barcode: non_empty(output.barcode.as_deref()),
        source: Source::AiGenerated,
    }
}

fn placeholder_record(search_term: &str, source: Source, text: &StringTable) -> MedicineDetails {
    MedicineDetails {
        id: synthetic_id(search_term),
        name: or_placeholder(Some(search_term), text),
        composition: text.not_available.to_string(),
        usage: text.not_available.to_string(),
        manufacturer: text.not_available.to_string(),
        dosage: text.not_available.to_string(),
        side_effects: text.not_available.to_string(),
        barcode: None,
        source,
    }
}

fn synthetic_id(search_term: &str) -> String {
    let slug: Vec<String> = search_term
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("ai-{}", slug.join("-"))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_placeholder(value: Option<&str>, text: &StringTable) -> String {
    non_empty(value).unwrap_or_else(|| text.not_available.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> &'static StringTable {
        strings(Language::En)
    }

    fn dolo() -> StoredRecord {
        StoredRecord {
            id: "3".into(),
            name: "Dolo 650".into(),
            composition: "Paracetamol 650mg".into(),
            barcode: Some("8901296001035".into()),
        }
    }

    fn full_output(tag: SynthesisTag) -> SynthesizeOutput {
        SynthesizeOutput {
            name: Some("Dolo 650".into()),
            composition: Some("Paracetamol 650mg".into()),
            usage: Some("Fever and mild pain".into()),
            manufacturer: Some("Micro Labs".into()),
            dosage: Some("1 tablet up to 3 times a day".into()),
            side_effects: Some("Nausea".into()),
            barcode: None,
            source: Some(tag),
        }
    }

    fn assert_no_empty_fields(d: &MedicineDetails) {
        for field in [
            &d.id,
            &d.name,
            &d.composition,
            &d.usage,
            &d.manufacturer,
            &d.dosage,
            &d.side_effects,
        ] {
            assert!(!field.trim().is_empty(), "empty field in {d:?}");
        }
    }

    #[test]
    fn record_mode_success_is_database_ai_enhanced() {
        let ctx = SynthesisContext::Record(dolo());
        let d = resolve(&ctx, Ok(full_output(SynthesisTag::DatabaseAiEnhanced)), en());
        assert_eq!(d.source, Source::DatabaseAiEnhanced);
        assert_eq!(d.id, "3");
        assert_eq!(d.manufacturer, "Micro Labs");
        assert_eq!(d.barcode.as_deref(), Some("8901296001035"));
    }

    #[test]
    fn record_mode_never_takes_identity_from_model() {
        let mut out = full_output(SynthesisTag::DatabaseAiEnhanced);
        out.name = Some("Dolo 500".into());
        out.composition = Some("Paracetamol 500mg".into());
        let d = resolve(&SynthesisContext::Record(dolo()), Ok(out), en());
        assert_eq!(d.name, "Dolo 650");
        assert_eq!(d.composition, "Paracetamol 650mg");
    }

    #[test]
    fn record_mode_wrong_tag_downgrades() {
        let d = resolve(
            &SynthesisContext::Record(dolo()),
            Ok(full_output(SynthesisTag::AiGenerated)),
            en(),
        );
        assert_eq!(d.source, Source::DatabaseOnly);
        assert_eq!(d.name, "Dolo 650");
        assert_eq!(d.usage, en().not_available);
    }

    #[test]
    fn record_mode_echo_without_details_downgrades() {
        let out = SynthesizeOutput {
            name: Some("Dolo 650".into()),
            composition: Some("Paracetamol 650mg".into()),
            usage: Some("  ".into()),
            manufacturer: Some(String::new()),
            source: Some(SynthesisTag::DatabaseAiEnhanced),
            ..Default::default()
        };
        let d = resolve(&SynthesisContext::Record(dolo()), Ok(out), en());
        assert_eq!(d.source, Source::DatabaseOnly);
        assert_no_empty_fields(&d);
    }

    #[test]
    fn record_mode_partial_details_use_placeholder() {
        let mut out = full_output(SynthesisTag::DatabaseAiEnhanced);
        out.manufacturer = Some(" ".into());
        out.dosage = None;
        let d = resolve(&SynthesisContext::Record(dolo()), Ok(out), strings(Language::Hi));
        assert_eq!(d.source, Source::DatabaseAiEnhanced);
        assert_eq!(d.manufacturer, strings(Language::Hi).not_available);
        assert_eq!(d.dosage, strings(Language::Hi).not_available);
        assert_eq!(d.usage, "Fever and mild pain");
    }

    #[test]
    fn record_mode_error_keeps_record() {
        for err in [GeminiError::ApiKeyNotSet, GeminiError::RateLimited] {
            let d = resolve(&SynthesisContext::Record(dolo()), Err(err), en());
            assert_eq!(d.source, Source::DatabaseOnly);
            assert_eq!(d.name, "Dolo 650");
            assert_eq!(d.composition, "Paracetamol 650mg");
            assert_no_empty_fields(&d);
        }
    }

    #[test]
    fn open_mode_success_is_ai_generated() {
        let ctx = SynthesisContext::Open {
            search_term: "dolo".into(),
        };
        let d = resolve(&ctx, Ok(full_output(SynthesisTag::AiGenerated)), en());
        assert_eq!(d.source, Source::AiGenerated);
        assert_eq!(d.name, "Dolo 650");
        assert_eq!(d.id, "ai-dolo");
    }

    #[test]
    fn open_mode_missing_identity_is_ai_failed() {
        let mut out = full_output(SynthesisTag::AiGenerated);
        out.composition = Some(String::new());
        let ctx = SynthesisContext::Open {
            search_term: "xyznonsense".into(),
        };
        let d = resolve(&ctx, Ok(out), en());
        assert_eq!(d.source, Source::AiFailed);
        assert_eq!(d.name, "xyznonsense");
        assert_eq!(d.usage, en().not_available);
    }

    #[test]
    fn open_mode_wrong_tag_is_ai_failed() {
        let ctx = SynthesisContext::Open {
            search_term: "dolo".into(),
        };
        let d = resolve(&ctx, Ok(full_output(SynthesisTag::DatabaseAiEnhanced)), en());
        assert_eq!(d.source, Source::AiFailed);
        assert_eq!(d.name, "dolo");
    }

    #[test]
    fn open_mode_errors_are_classified() {
        let ctx = SynthesisContext::Open {
            search_term: "xyznonsense".into(),
        };
        let d = resolve(&ctx, Err(GeminiError::Auth("bad key".into())), en());
        assert_eq!(d.source, Source::AiUnavailable);

        let d = resolve(&ctx, Err(GeminiError::MalformedOutput("eof".into())), en());
        assert_eq!(d.source, Source::AiFailed);
        assert_eq!(d.name, "xyznonsense");
        for field in [&d.composition, &d.usage, &d.manufacturer, &d.dosage, &d.side_effects] {
            assert_eq!(field, en().not_available);
        }
    }

    #[test]
    fn synthetic_id_is_slugged() {
        assert_eq!(synthetic_id("Dolo 650 (strip)"), "ai-dolo-650-strip");
    }

    #[test]
    fn record_input_carries_context() {
        let input = SynthesisContext::Record(dolo()).to_input(Language::Bn);
        assert_eq!(input.context_composition.as_deref(), Some("Paracetamol 650mg"));
        assert_eq!(input.context_barcode.as_deref(), Some("8901296001035"));
        assert_eq!(input.language, Language::Bn);

        let input = SynthesisContext::Open {
            search_term: "pan".into(),
        }
        .to_input(Language::En);
        assert!(input.context_name.is_none());
        assert_eq!(input.search_term_or_name, "pan");
    }
}
