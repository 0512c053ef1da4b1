//! Best-effort diagnostic reporting. A failure to record a report must never
//! mask or replace the error being surfaced to the end user; callers treat the
//! sink as fire-and-forget.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const ERROR_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ERROR_ID_LENGTH: usize = 6;
const COMPANY_PREFIX_MAX_CHARS: usize = 50;

/// A diagnostic record persisted for offline analysis, correlated with the
/// user-facing response through its short id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(default = "generate_error_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: generate_error_id(),
            kind: kind.into(),
            error: message.into(),
            detail: None,
            timestamp: Utc::now(),
            company_name: None,
            user_agent: None,
        }
    }

    /// Filename-style key the report is stored under, prefixed with the
    /// sanitized company name so support can eyeball a listing.
    pub fn storage_key(&self) -> String {
        let company = sanitize_company(self.company_name.as_deref());
        format!("{}_{}.json", company, self.id)
    }
}

/// Short correlation id of the form `ERR-XXXXXX`.
pub fn generate_error_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ERROR_ID_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..ERROR_ID_ALPHABET.len());
            ERROR_ID_ALPHABET[index] as char
        })
        .collect();
    format!("ERR-{}", suffix)
}

fn sanitize_company(name: Option<&str>) -> String {
    let name = match name {
        Some(value) if !value.trim().is_empty() => value,
        _ => "Unknown-Company",
    };
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .take(COMPANY_PREFIX_MAX_CHARS)
        .collect()
}

/// Sink for diagnostic reports (blob store, log shipper, in-memory for tests).
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, report: ErrorReport) -> Result<(), DiagnosticError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("diagnostic sink unavailable: {0}")]
    Unavailable(String),
}

/// Process-local sink keyed the same way a blob backend would be.
#[derive(Default)]
pub struct InMemoryDiagnosticLog {
    reports: Mutex<HashMap<String, ErrorReport>>,
}

impl DiagnosticSink for InMemoryDiagnosticLog {
    fn record(&self, report: ErrorReport) -> Result<(), DiagnosticError> {
        let mut guard = self.reports.lock().expect("diagnostic mutex poisoned");
        guard.insert(report.storage_key(), report);
        Ok(())
    }
}

impl InMemoryDiagnosticLog {
    pub fn reports(&self) -> Vec<ErrorReport> {
        let guard = self.reports.lock().expect("diagnostic mutex poisoned");
        guard.values().cloned().collect()
    }

    pub fn find(&self, id: &str) -> Option<ErrorReport> {
        let guard = self.reports.lock().expect("diagnostic mutex poisoned");
        guard.values().find(|report| report.id == id).cloned()
    }
}
