use serde::{Deserialize, Serialize};

use crate::model::NewApplication;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Insert new records and overwrite existing ones by id
    #[default]
    Upsert,
    /// Clear the store first, then insert everything
    Replace,
}

/// Bulk import payload, typically parsed from a spreadsheet by the frontend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub apps: Vec<NewApplication>,
    #[serde(default)]
    pub mode: ImportMode,
}

/// What the store did with the valid records of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub added: usize,
    pub updated: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub errors: usize,
    pub total: usize,
    pub message: String,
}

impl ImportSummary {
    pub fn new(outcome: ImportOutcome, rejected: usize) -> Self {
        Self {
            added: outcome.added,
            updated: outcome.updated,
            errors: outcome.failed + rejected,
            total: outcome.added + outcome.updated,
            message: "Import complete".to_string(),
        }
    }
}
