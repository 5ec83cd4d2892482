//! Read-only view of the portal's documents, used to ground chat answers

use serde::{Deserialize, Serialize};

/// Editorial status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocStatus {
    Draft,
    Published,
    Archived,
}

/// A portal document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub status: DocStatus,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>, status: DocStatus) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == DocStatus::Published
    }
}

/// Source of portal documents
pub trait DocumentCorpus: Send + Sync {
    /// Every document, regardless of status
    fn documents(&self) -> Vec<Document>;
}

/// Fixed in-memory corpus
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    documents: Vec<Document>,
}

impl MemoryCorpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentCorpus for MemoryCorpus {
    fn documents(&self) -> Vec<Document> {
        self.documents.clone()
    }
}
