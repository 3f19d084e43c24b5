//! Sign, broadcast and normalize results
//!
//! One broadcast holds the handle's broadcast lock from fee simulation through
//! submission, so concurrent callers sharing an account never race on its
//! sequence number. The lock also remembers the last sequence submitted, so a
//! transaction still pending after an inclusion timeout is not signed over.

use crate::chain::{find_attribute, TxEvent, TxResponse};
use crate::client::{ClientHandle, SigningClient};
use crate::fees::{estimate_fee, Fee};
use crate::guards::AuditEntry;
use crate::registry::ChainMessage;
use crate::{Error, Result};
use serde::Serialize;
use std::time::Instant;

/// Code a node returns for a transaction signed at the wrong sequence
pub const SEQUENCE_MISMATCH: u32 = 32;

/// Normalized outcome of an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxResult {
    pub tx_hash: String,
    pub height: u64,
    pub gas_used: u64,
    pub gas_wanted: u64,
    pub code: u32,
    #[serde(skip)]
    pub events: Vec<TxEvent>,
}

impl TxResult {
    /// First value of `key` among events of type `kind`
    pub fn event_attribute(&self, kind: &str, key: &str) -> Option<&str> {
        find_attribute(&self.events, kind, key)
    }
}

/// Turn a chain response into a result, or `TransactionRejected` for a non-zero code
pub fn normalize(response: TxResponse) -> Result<TxResult> {
    if response.code != 0 {
        return Err(Error::TransactionRejected {
            code: response.code,
            raw_log: response.raw_log,
        });
    }
    Ok(TxResult {
        tx_hash: response.hash,
        height: response.height,
        gas_used: response.gas_used,
        gas_wanted: response.gas_wanted,
        code: response.code,
        events: response.events,
    })
}

/// Sequence bookkeeping ahead of committed chain state
#[derive(Debug, Default)]
pub struct SequenceTracker {
    next: Option<u64>,
}

impl SequenceTracker {
    /// Sequence to sign the next transaction with
    pub fn next_sequence(&self, committed: u64) -> u64 {
        self.next.map_or(committed, |next| next.max(committed))
    }

    /// Record what happened to a transaction signed at `used`
    pub fn settle(&mut self, used: u64, outcome: &Result<TxResponse>) {
        self.next = match outcome {
            Ok(response) if response.code == SEQUENCE_MISMATCH => None,
            // Included, even if execution failed
            Ok(response) if response.code == 0 || response.height > 0 => Some(used + 1),
            // Rejected at check time, the sequence was not consumed
            Ok(_) => self.next,
            // Still in the mempool
            Err(Error::InclusionTimeout { .. }) => Some(used + 1),
            Err(_) => None,
        };
    }
}

impl ClientHandle {
    /// Sign and broadcast chain-native messages as one transaction
    pub async fn sign_and_broadcast(
        &self,
        messages: &[ChainMessage],
        memo: &str,
    ) -> Result<TxResult> {
        let client = self.signing_client().await?;
        self.broadcast_via(client, messages, memo).await
    }

    /// Sign and broadcast contract executions as one transaction
    pub async fn execute(&self, messages: &[ChainMessage], memo: &str) -> Result<TxResult> {
        let client = self.exec_client().await?;
        self.broadcast_via(client, messages, memo).await
    }

    /// Simulate messages and return the fee a broadcast would attach
    pub async fn estimate(&self, messages: &[ChainMessage], memo: &str) -> Result<Fee> {
        if messages.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one message is required".to_string(),
            ));
        }
        let client = self.signing_client().await?;
        let payload = client.encode(messages)?;
        let config = self.config();
        estimate_fee(
            client.backend(),
            client.identity(),
            &payload,
            memo,
            &config.gas,
            &config.chain,
        )
        .await
    }

    async fn broadcast_via(
        &self,
        client: &SigningClient,
        messages: &[ChainMessage],
        memo: &str,
    ) -> Result<TxResult> {
        if messages.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one message is required".to_string(),
            ));
        }
        // Encoded once: the simulated payload is the signed payload
        let payload = client.encode(messages)?;
        let type_urls: Vec<String> = payload.iter().map(|m| m.type_url.clone()).collect();
        let started = Instant::now();

        let outcome = {
            let mut tracker = self.broadcast_lock.lock().await;
            let config = self.config();
            match estimate_fee(
                client.backend(),
                client.identity(),
                &payload,
                memo,
                &config.gas,
                &config.chain,
            )
            .await
            {
                Ok(fee) => match client.backend().committed_sequence(client.identity()).await {
                    Ok(committed) => {
                        let sequence = tracker.next_sequence(committed);
                        let submitted = client
                            .backend()
                            .sign_and_submit(client.identity(), &payload, &fee, memo, sequence)
                            .await;
                        tracker.settle(sequence, &submitted);
                        submitted.and_then(normalize)
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(result) => tracing::info!(
                tx_hash = %result.tx_hash,
                height = result.height,
                gas_used = result.gas_used,
                messages = ?type_urls,
                "Transaction succeeded"
            ),
            Err(e) => tracing::warn!(
                error_kind = e.kind(),
                error = %e,
                messages = ?type_urls,
                "Transaction failed"
            ),
        }

        if let Some(audit) = self.audit() {
            let entry = AuditEntry::new(client.address(), type_urls, memo);
            let entry = match &outcome {
                Ok(result) => entry.included(&result.tx_hash, elapsed_ms),
                Err(e) => entry.failed(e, elapsed_ms),
            };
            audit.record(&entry).await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{harness, harness_with};
    use crate::config::Config;
    use crate::registry::proto::{Coin, MsgSend};
    use crate::registry::type_urls::MSG_SEND;

    fn send(to: &str, amount: u128) -> ChainMessage {
        ChainMessage::Send(MsgSend {
            from_address: "bostrom1me".into(),
            to_address: to.into(),
            amount: vec![Coin::new("boot", amount)],
        })
    }

    #[test]
    fn normalize_keeps_raw_log_verbatim() {
        let err = normalize(TxResponse {
            code: 5,
            raw_log: "insufficient funds: 1boot is smaller than 5boot".into(),
            ..TxResponse::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::TransactionRejected { code: 5, ref raw_log }
                if raw_log == "insufficient funds: 1boot is smaller than 5boot"
        ));
    }

    #[tokio::test]
    async fn success_reports_hash_height_and_gas() {
        let h = harness();
        let result = h
            .handle
            .sign_and_broadcast(&[send("bostrom1to", 10)], "hello")
            .await
            .unwrap();

        assert_eq!(result.code, 0);
        assert!(!result.tx_hash.is_empty());
        assert_eq!(result.gas_wanted, 112_000);

        let submitted = h.chain.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].fee.gas_limit, 112_000);
        assert_eq!(submitted[0].fee.amount, 1_120);
        assert_eq!(submitted[0].fee.denom, "boot");
        assert_eq!(submitted[0].memo, "hello");
    }

    #[tokio::test]
    async fn simulated_payload_is_signed_payload() {
        let h = harness();
        h.handle
            .sign_and_broadcast(&[send("bostrom1a", 1), send("bostrom1b", 2)], "")
            .await
            .unwrap();

        let simulated = h.chain.simulations();
        let submitted = h.chain.submissions();
        assert_eq!(simulated.len(), 1);
        assert_eq!(simulated[0], submitted[0].messages);
        assert_eq!(submitted[0].messages.len(), 2);
        assert!(submitted[0].messages.iter().all(|m| m.type_url == MSG_SEND));
    }

    #[tokio::test]
    async fn simulation_failure_submits_nothing() {
        let h = harness();
        h.chain.fail_simulation("out of gas in location: ReadFlat");

        let err = h
            .handle
            .sign_and_broadcast(&[send("bostrom1to", 1)], "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SimulationFailed(ref m) if m == "out of gas in location: ReadFlat"));
        assert!(h.chain.submissions().is_empty());
    }

    #[tokio::test]
    async fn nonzero_code_is_rejection_with_raw_log() {
        let h = harness();
        h.chain.reject_with(5, "insufficient funds");

        let err = h
            .handle
            .sign_and_broadcast(&[send("bostrom1to", 1)], "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TransactionRejected { code: 5, ref raw_log } if raw_log == "insufficient funds"
        ));
    }

    #[tokio::test]
    async fn empty_message_list_is_rejected() {
        let h = harness();
        let err = h.handle.sign_and_broadcast(&[], "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(h.chain.simulations().is_empty());
    }

    #[tokio::test]
    async fn unregistered_message_fails_before_simulation() {
        let h = harness();
        let exec = ChainMessage::ExecuteContract(Default::default());
        let err = h.handle.sign_and_broadcast(&[exec], "").await.unwrap_err();
        assert!(matches!(err, Error::UnknownTypeUrl(_)));
        assert!(h.chain.simulations().is_empty());
    }

    #[tokio::test]
    async fn concurrent_broadcasts_use_distinct_sequences() {
        let h = harness();
        let handle = &h.handle;
        let outcomes = futures::future::join_all(
            (0..5u128).map(|i| async move {
                handle
                    .sign_and_broadcast(&[send("bostrom1to", i + 1)], "")
                    .await
            }),
        )
        .await;

        for outcome in &outcomes {
            if let Err(e) = outcome {
                panic!("concurrent broadcast failed: {}", e);
            }
        }

        let mut sequences: Vec<u64> = h.chain.submissions().iter().map(|s| s.sequence).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
        assert_eq!(h.chain.sequence(), 5);
    }

    #[tokio::test]
    async fn pending_transaction_keeps_its_sequence_after_timeout() {
        let h = harness();
        h.chain.time_out_next();
        let err = h
            .handle
            .sign_and_broadcast(&[send("bostrom1to", 1)], "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InclusionTimeout { .. }));
        // Committed state has not moved; the first transaction is still pending
        assert_eq!(h.chain.sequence(), 0);

        h.handle
            .sign_and_broadcast(&[send("bostrom1to", 2)], "")
            .await
            .unwrap();

        let sequences: Vec<u64> = h.chain.submissions().iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
        assert_eq!(h.chain.sequence(), 2);
    }

    #[tokio::test]
    async fn sequence_mismatch_resyncs_from_chain() {
        let h = harness();
        h.chain.time_out_next();
        let _ = h.handle.sign_and_broadcast(&[send("bostrom1to", 1)], "").await;
        h.chain.drop_pending();

        let err = h
            .handle
            .sign_and_broadcast(&[send("bostrom1to", 2)], "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TransactionRejected { code: SEQUENCE_MISMATCH, .. }
        ));

        h.handle
            .sign_and_broadcast(&[send("bostrom1to", 3)], "")
            .await
            .unwrap();
        let sequences: Vec<u64> = h.chain.submissions().iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 0]);
        assert_eq!(h.chain.sequence(), 1);
    }

    #[test]
    fn tracker_never_signs_below_committed() {
        let mut tracker = SequenceTracker::default();
        assert_eq!(tracker.next_sequence(7), 7);

        tracker.settle(
            7,
            &Err(Error::InclusionTimeout {
                tx_hash: "AB".into(),
                waited_ms: 10,
            }),
        );
        assert_eq!(tracker.next_sequence(7), 8);
        // Chain caught up past what this handle submitted
        assert_eq!(tracker.next_sequence(12), 12);

        let check_rejected = TxResponse {
            code: 13,
            ..TxResponse::default()
        };
        tracker.settle(8, &Ok(check_rejected));
        assert_eq!(tracker.next_sequence(7), 8);

        tracker.settle(8, &Err(Error::Chain("connection reset".into())));
        assert_eq!(tracker.next_sequence(7), 7);
    }

    #[tokio::test]
    async fn audit_log_records_each_attempt() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            audit_log_path: Some(file.path().display().to_string()),
            ..Config::default()
        };
        let h = harness_with(config);

        h.handle
            .sign_and_broadcast(&[send("bostrom1to", 1)], "first")
            .await
            .unwrap();
        h.chain.reject_with(13, "insufficient fee");
        let _ = h.handle.sign_and_broadcast(&[send("bostrom1to", 1)], "second").await;

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["status"], "success");
        assert_eq!(lines[0]["type_urls"][0], MSG_SEND);
        assert_eq!(lines[1]["status"], "rejected");
        assert_eq!(lines[1]["code"], 13);
    }

    #[tokio::test]
    async fn estimate_does_not_submit() {
        let h = harness();
        h.chain.set_gas_used(200_000);
        let fee = h.handle.estimate(&[send("bostrom1to", 1)], "").await.unwrap();
        assert_eq!(fee.gas_limit, 280_000);
        assert_eq!(fee.amount, 2_800);
        assert!(h.chain.submissions().is_empty());
    }
}
