//! Pre-broadcast guards and the broadcast audit trail
//!
//! Guards run before anything is signed. A failed check means nothing was
//! simulated or submitted.

mod audit_log;
mod slippage_guard;
mod spend_limit;

pub use audit_log::{AuditEntry, AuditLog, AuditStatus};
pub use slippage_guard::SlippageGuard;
pub use spend_limit::SpendLimit;
