//! ICS-20 token transfers

use super::{require_non_empty, require_positive};
use crate::broadcast::TxResult;
use crate::client::ClientHandle;
use crate::registry::proto::{Coin, Height, MsgTransfer};
use crate::registry::ChainMessage;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const TRANSFER_PORT: &str = "transfer";
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 10;

const NANOS_PER_MINUTE: u64 = 60 * 1_000_000_000;

#[derive(Debug, Clone, Serialize)]
pub struct IbcTransferResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub receiver: String,
    pub channel: String,
    pub denom: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub timeout_minutes: u64,
    pub timeout_timestamp: u64,
}

/// Unix nanoseconds `minutes` after `now`
pub fn timeout_timestamp(now: DateTime<Utc>, minutes: u64) -> Result<u64> {
    let now_ns = now
        .timestamp_nanos_opt()
        .and_then(|ns| u64::try_from(ns).ok())
        .ok_or_else(|| Error::InvalidArgument("Clock is outside the nanosecond range".into()))?;
    minutes
        .checked_mul(NANOS_PER_MINUTE)
        .and_then(|delta| now_ns.checked_add(delta))
        .ok_or_else(|| Error::InvalidArgument(format!("Timeout of {} minutes is too long", minutes)))
}

impl ClientHandle {
    /// Transfer tokens over `channel`, timing out after `timeout_minutes` (10 by default)
    ///
    /// The receiver lives on the counterparty chain, so its prefix is not checked.
    pub async fn ibc_transfer(
        &self,
        channel: &str,
        denom: &str,
        amount: u128,
        receiver: &str,
        timeout_minutes: Option<u64>,
    ) -> Result<IbcTransferResult> {
        self.spend_limit().check(amount, denom)?;
        require_positive(amount, "Transfer amount")?;
        require_non_empty(channel, "Channel")?;
        require_non_empty(receiver, "Receiver")?;
        let timeout_minutes = timeout_minutes.unwrap_or(DEFAULT_TIMEOUT_MINUTES);
        if timeout_minutes == 0 {
            return Err(Error::InvalidArgument(
                "Timeout must be at least one minute".to_string(),
            ));
        }
        let timeout = timeout_timestamp(Utc::now(), timeout_minutes)?;

        let sender = self.address().await?;
        let message = ChainMessage::Transfer(MsgTransfer {
            source_port: TRANSFER_PORT.to_string(),
            source_channel: channel.to_string(),
            token: Some(Coin::new(denom, amount)),
            sender: sender.clone(),
            receiver: receiver.to_string(),
            timeout_height: Some(Height::default()),
            timeout_timestamp: timeout,
            memo: String::new(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(IbcTransferResult {
            tx,
            sender,
            receiver: receiver.to_string(),
            channel: channel.to_string(),
            denom: denom.to_string(),
            amount,
            timeout_minutes,
            timeout_timestamp: timeout,
        })
    }
}
