use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::{RecordStore, StoreError};
use crate::models::StoredRecord;

/// In-process record store, seeded with the built-in dataset or loaded from a
/// JSON array of records.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Vec<StoredRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<StoredRecord>) -> Result<Self, StoreError> {
        let mut ids = HashSet::new();
        for record in &records {
            if record.id.trim().is_empty() || record.name.trim().is_empty() {
                return Err(StoreError::Corrupt(format!(
                    "record without id or name: {record:?}"
                )));
            }
            if !ids.insert(record.id.as_str()) {
                return Err(StoreError::Corrupt(format!("duplicate id '{}'", record.id)));
            }
        }
        Ok(Self { records })
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)?;
        let records: Vec<StoredRecord> = serde_json::from_str(&text)?;
        debug!(path = %path.display(), records = records.len(), "record store loaded");
        Self::new(records)
    }

    /// The bundled sample dataset.
    pub fn sample() -> Self {
        let records = SAMPLE
            .iter()
            .map(|(id, name, composition, barcode)| StoredRecord {
                id: id.to_string(),
                name: name.to_string(),
                composition: composition.to_string(),
                barcode: barcode.map(str::to_string),
            })
            .collect();
        Self { records }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    fn matches(&self, term: &str) -> Vec<StoredRecord> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let by_barcode: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.barcode.as_deref().is_some_and(|b| b == term.trim()))
            .cloned()
            .collect();
        if !by_barcode.is_empty() {
            return by_barcode;
        }

        let by_name: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase() == needle)
            .cloned()
            .collect();
        if !by_name.is_empty() {
            return by_name;
        }

        self.records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.composition.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

impl RecordStore for MemoryStore {
    async fn lookup_by_term(&self, term: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let found = self.matches(term);
        debug!(term, records = found.len(), "store lookup");
        Ok(found)
    }

    async fn list_suggestions(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let starts = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().starts_with(&needle));
        let contains = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle));

        Ok(starts
            .chain(contains)
            .filter(|r| seen.insert(r.name.as_str()))
            .take(limit)
            .map(|r| r.name.clone())
            .collect())
    }
}

const SAMPLE: &[(&str, &str, &str, Option<&str>)] = &[
    ("1", "Crocin Advance", "Paracetamol 500mg", Some("8901030704826")),
    ("2", "Calpol 500", "Paracetamol 500mg", None),
    ("3", "Dolo 650", "Paracetamol 650mg", Some("8901296001035")),
    ("4", "Azithral 500", "Azithromycin 500mg", None),
    ("5", "Pan 40", "Pantoprazole 40mg", Some("8901117010604")),
    ("6", "Allegra 120", "Fexofenadine 120mg", None),
    ("7", "Combiflam", "Ibuprofen 400mg + Paracetamol 325mg", None),
    ("8", "Augmentin 625 Duo", "Amoxycillin 500mg + Clavulanic Acid 125mg", None),
];
