use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A document stored in a RAG index.
///
/// `doc_id` is assigned by the backend on creation and is absent from
/// freshly built documents headed into `indexDocuments`; it is present on
/// anything round-tripped through `listDocuments` and is required for
/// `updateDocuments`/`deleteDocuments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    pub text: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_type: Option<SplitType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Code,
}

impl Document {
    /// Builds a fresh (backend-unassigned) document for `file_name`, setting
    /// `language`/`split_type` only when `language` is `Some` — i.e. only
    /// when the file's classified language is in the configured allow-list
    /// (invariant 2, spec §3).
    pub fn new(file_name: impl Into<String>, text: impl Into<String>, language: Option<Language>) -> Self {
        Self {
            doc_id: None,
            text: text.into(),
            metadata: Metadata {
                file_name: file_name.into(),
                split_type: language.map(|_| SplitType::Code),
                language,
            },
        }
    }
}
