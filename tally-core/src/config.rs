//! Summarizer parameters shared by every dashboard variant

use serde::{Deserialize, Serialize};

/// What to do with a `type` label that is in neither vocabulary
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnrecognizedLabels {
    /// Leave the row out of both inflow and outflow
    #[default]
    #[serde(rename = "exclude")]
    Exclude,
    /// Classify the row by the sign of its amount instead
    #[serde(rename = "by-sign")]
    BySign,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Labels that mark a row as money received (matched case-insensitively)
    pub inflow_labels: Vec<String>,
    /// Labels that mark a row as money spent (matched case-insensitively)
    pub outflow_labels: Vec<String>,
    /// Replace negative savings with zero
    pub clamp_savings_at_zero: bool,
    /// Category key for rows without a category
    pub uncategorized_bucket_name: String,
    pub unrecognized_labels: UnrecognizedLabels,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            inflow_labels: vec!["inflow".to_string(), "credit".to_string()],
            outflow_labels: vec!["outflow".to_string(), "debit".to_string()],
            clamp_savings_at_zero: false,
            uncategorized_bucket_name: "Uncategorized".to_string(),
            unrecognized_labels: UnrecognizedLabels::Exclude,
        }
    }
}

impl SummarizerConfig {
    pub fn with_clamp_savings(mut self, clamp: bool) -> Self {
        self.clamp_savings_at_zero = clamp;
        self
    }

    pub fn with_unrecognized_labels(mut self, policy: UnrecognizedLabels) -> Self {
        self.unrecognized_labels = policy;
        self
    }

    pub fn is_inflow_label(&self, label: &str) -> bool {
        matches_any(&self.inflow_labels, label)
    }

    pub fn is_outflow_label(&self, label: &str) -> bool {
        matches_any(&self.outflow_labels, label)
    }
}

/// Same folding as CSV headers: trim, then Unicode lower-case.
fn matches_any(vocab: &[String], label: &str) -> bool {
    let label = label.trim().to_lowercase();
    vocab.iter().any(|v| v.trim().to_lowercase() == label)
}
