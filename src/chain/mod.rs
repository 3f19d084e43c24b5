//! Chain access
//!
//! [`ChainQuery`] covers the reads the core depends on and needs no
//! credential. [`TxBackend`] simulates and submits signed transactions.
//! [`TxConnector`] produces a connected backend on first use.

pub mod lcd;
pub mod signing;

#[cfg(test)]
pub(crate) mod fake;

use crate::amount::as_string;
use crate::fees::Fee;
use crate::registry::proto::{Any, Coin};
use crate::wallet::SigningIdentity;
use crate::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use lcd::LcdClient;
pub use signing::{LcdConnector, LcdTxBackend};

/// Token balance in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub denom: String,
    #[serde(with = "as_string")]
    pub amount: u128,
}

impl Balance {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl From<&Balance> for Coin {
    fn from(balance: &Balance) -> Self {
        Coin::new(balance.denom.clone(), balance.amount)
    }
}

/// Liquidity pool as listed by the exchange module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    #[serde(with = "as_string")]
    pub id: u64,
    #[serde(default)]
    pub type_id: u32,
    pub reserve_coin_denoms: Vec<String>,
    pub reserve_account_address: String,
    #[serde(default)]
    pub pool_coin_denom: String,
}

/// Exchange module parameters the swap path needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityParams {
    pub swap_fee_rate: Decimal,
}

/// A delegation held by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub validator_address: String,
    pub balance: Balance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Event emitted while executing an included transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    pub fn new(kind: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Self {
            kind: kind.into(),
            attributes: attributes
                .iter()
                .map(|(key, value)| EventAttribute {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// First value of `key` among events of type `kind`
pub fn find_attribute<'a>(events: &'a [TxEvent], kind: &str, key: &str) -> Option<&'a str> {
    events
        .iter()
        .filter(|event| event.kind == kind)
        .flat_map(|event| event.attributes.iter())
        .find(|attribute| attribute.key == key)
        .map(|attribute| attribute.value.as_str())
}

/// Outcome of a submitted transaction as reported by the chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    pub height: u64,
    pub code: u32,
    pub gas_used: u64,
    pub gas_wanted: u64,
    pub raw_log: String,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

/// Read-only chain queries
#[async_trait]
pub trait ChainQuery: Send + Sync {
    async fn balances(&self, address: &str) -> Result<Vec<Balance>>;

    async fn pools(&self) -> Result<Vec<PoolInfo>>;

    async fn liquidity_params(&self) -> Result<LiquidityParams>;

    async fn delegations(&self, delegator: &str) -> Result<Vec<Delegation>>;
}

/// Transaction simulation and submission for a signer
#[async_trait]
pub trait TxBackend: Send + Sync {
    /// Dry-run `messages` and return the gas used
    async fn simulate(
        &self,
        signer: &SigningIdentity,
        messages: &[Any],
        memo: &str,
    ) -> Result<u64>;

    /// Committed account sequence; excludes transactions still in the mempool
    async fn committed_sequence(&self, signer: &SigningIdentity) -> Result<u64>;

    /// Sign at `sequence` with SIGN_MODE_DIRECT, submit, and wait for the chain's verdict
    ///
    /// A non-zero `code` is returned as data, not as an error.
    async fn sign_and_submit(
        &self,
        signer: &SigningIdentity,
        messages: &[Any],
        fee: &Fee,
        memo: &str,
        sequence: u64,
    ) -> Result<TxResponse>;
}

/// Connects a transaction backend on first use
#[async_trait]
pub trait TxConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn TxBackend>>;
}
