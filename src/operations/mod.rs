//! Write operations built on the broadcast core
//!
//! Each operation resolves the signer address, builds its messages, and
//! submits them through [`ClientHandle::sign_and_broadcast`] (or the contract
//! executor). Results flatten the [`TxResult`](crate::broadcast::TxResult)
//! and echo the inputs that shaped the transaction.
//!
//! [`ClientHandle::sign_and_broadcast`]: crate::client::ClientHandle::sign_and_broadcast

pub mod contract;
pub mod graph;
pub mod grid;
pub mod ibc;
pub mod tokenfactory;
pub mod wallet;

pub use contract::{ContractCall, ExecuteMultiResult, ExecuteResult};
pub use graph::{CyberlinkResult, CyberlinksResult, InvestmintResult, Resource};
pub use grid::RouteResult;
pub use ibc::{IbcTransferResult, DEFAULT_TIMEOUT_MINUTES, TRANSFER_PORT};
pub use tokenfactory::{AdminResult, CreateDenomResult, SupplyResult};
pub use wallet::{
    ClaimRewardsResult, RedelegateResult, SendResult, StakeResult, VoteOption, VoteResult,
};

use crate::{Error, Result};

/// Reject zero amounts before anything is signed
pub(crate) fn require_positive(amount: u128, what: &str) -> Result<()> {
    if amount == 0 {
        return Err(Error::InvalidArgument(format!(
            "{} must be greater than zero",
            what
        )));
    }
    Ok(())
}

pub(crate) fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}
