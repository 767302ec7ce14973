//! Document record for an uploaded file.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata key selecting the target case namespace.
pub const CASE_NAME_KEY: &str = "caseName";

/// One uploaded, ingested file.
///
/// A document record is written only after its chunk vectors are durably
/// stored; the label set is the only field mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Account that owns this document.
    pub account_id: Uuid,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// URL of the original file in blob storage.
    pub storage_url: String,
    /// Vector-index namespace the chunks were written into.
    pub namespace: String,
    /// Number of chunks produced during ingestion.
    pub chunk_count: usize,
    /// Number of characters of extracted text.
    pub character_count: usize,
    /// User-assigned labels, deduplicated and sorted.
    pub labels: Vec<String>,
    /// Free-form user-supplied metadata.
    pub metadata: serde_json::Value,
    /// Upload timestamp.
    pub created_at: Timestamp,
}

impl Document {
    /// Returns the raw case name from the metadata, if present.
    pub fn case_name(&self) -> Option<&str> {
        self.metadata.get(CASE_NAME_KEY).and_then(|v| v.as_str())
    }

    /// Returns whether the document carries the given label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Normalizes a label set: trims entries, drops empties, deduplicates and
/// sorts so that label sets compare order-insensitively.
pub fn normalize_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut normalized: Vec<String> = labels
        .into_iter()
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
        .collect();

    normalized.sort();
    normalized.dedup();
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_deduplicate_and_sort() {
        let labels = normalize_labels(vec![
            "privileged".to_string(),
            " exhibit ".to_string(),
            "privileged".to_string(),
            "".to_string(),
        ]);

        assert_eq!(labels, vec!["exhibit".to_string(), "privileged".to_string()]);
    }

    #[test]
    fn case_name_reads_metadata_key() {
        let document = Document {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            file_name: "contract.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            storage_url: "memory://uploads/contract.pdf".to_string(),
            namespace: "smith-vs-jones".to_string(),
            chunk_count: 3,
            character_count: 2048,
            labels: vec![],
            metadata: serde_json::json!({ "caseName": "Smith vs. Jones" }),
            created_at: Timestamp::UNIX_EPOCH,
        };

        assert_eq!(document.case_name(), Some("Smith vs. Jones"));
        assert!(!document.has_label("exhibit"));
    }
}
