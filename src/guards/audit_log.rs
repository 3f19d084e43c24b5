//! Broadcast audit log
//!
//! Appends one JSON line per broadcast attempt for compliance and debugging.
//! Failing to write never fails the broadcast.

use crate::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Included with code 0
    Success,
    /// Chain returned a non-zero code
    Rejected,
    /// Failed before or during submission
    Error,
}

/// Entry in the audit log
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub signer: String,
    pub type_urls: Vec<String>,
    pub memo: String,
    pub status: AuditStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl AuditEntry {
    pub fn new(signer: &str, type_urls: Vec<String>, memo: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            signer: signer.to_string(),
            type_urls,
            memo: memo.to_string(),
            status: AuditStatus::Success,
            tx_hash: None,
            code: None,
            error_kind: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn included(mut self, tx_hash: &str, duration_ms: u64) -> Self {
        self.status = AuditStatus::Success;
        self.tx_hash = Some(tx_hash.to_string());
        self.code = Some(0);
        self.duration_ms = duration_ms;
        self
    }

    pub fn failed(mut self, error: &Error, duration_ms: u64) -> Self {
        self.status = match error {
            Error::TransactionRejected { code, .. } => {
                self.code = Some(*code);
                AuditStatus::Rejected
            }
            _ => AuditStatus::Error,
        };
        if let Error::InclusionTimeout { tx_hash, .. } = error {
            self.tx_hash = Some(tx_hash.clone());
        }
        self.error_kind = Some(error.kind());
        self.error = Some(error.to_string());
        self.duration_ms = duration_ms;
        self
    }
}

struct AuditLogWriter {
    path: PathBuf,
}

impl AuditLogWriter {
    fn write(&self, entry: &AuditEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Shared JSONL writer
#[derive(Clone)]
pub struct AuditLog {
    writer: Arc<Mutex<AuditLogWriter>>,
}

impl AuditLog {
    /// # Arguments
    /// * `log_path` - Path to the audit log file (JSONL format)
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(AuditLogWriter {
                path: log_path.into(),
            })),
        }
    }

    pub async fn record(&self, entry: &AuditEntry) {
        let writer = self.writer.lock().await;
        if let Err(e) = writer.write(entry) {
            tracing::warn!(error = %e, path = %writer.path.display(), "Failed to write audit log entry");
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}
