//! In-memory chain for tests
//!
//! Models an account sequence: committed transactions plus a mempool of
//! pending ones. A submission must sign at committed + pending, otherwise it
//! collides the way it would on a real node (code 32). Queries only see the
//! committed part.

use super::{
    Balance, ChainQuery, Delegation, LiquidityParams, PoolInfo, TxBackend, TxConnector, TxEvent,
    TxResponse,
};
use crate::broadcast::SEQUENCE_MISMATCH;
use crate::fees::Fee;
use crate::registry::proto::Any;
use crate::wallet::SigningIdentity;
use crate::{Error, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A transaction the fake chain accepted for processing
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub messages: Vec<Any>,
    pub fee: Fee,
    pub memo: String,
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct State {
    sequence: u64,
    pending: u64,
    time_out_next: bool,
    simulations: Vec<Vec<Any>>,
    submissions: Vec<Submitted>,
    balances: HashMap<String, Vec<Balance>>,
    pools: Vec<PoolInfo>,
    swap_fee_rate: Option<Decimal>,
    delegations: HashMap<String, Vec<Delegation>>,
    events: Vec<TxEvent>,
    gas_used: u64,
    simulate_error: Option<String>,
    submit_code: u32,
    submit_log: String,
}

#[derive(Debug)]
pub struct FakeChain {
    state: Mutex<State>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                gas_used: 80_000,
                swap_fee_rate: Some(Decimal::new(3, 3)),
                ..State::default()
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn set_gas_used(&self, gas: u64) {
        self.with_state(|s| s.gas_used = gas);
    }

    pub fn fail_simulation(&self, message: &str) {
        self.with_state(|s| s.simulate_error = Some(message.to_string()));
    }

    pub fn reject_with(&self, code: u32, raw_log: &str) {
        self.with_state(|s| {
            s.submit_code = code;
            s.submit_log = raw_log.to_string();
        });
    }

    /// Accept the next submission into the mempool but never report it included
    pub fn time_out_next(&self) {
        self.with_state(|s| s.time_out_next = true);
    }

    /// Evict pending transactions without committing them
    pub fn drop_pending(&self) {
        self.with_state(|s| s.pending = 0);
    }

    pub fn set_balances(&self, address: &str, balances: Vec<Balance>) {
        self.with_state(|s| {
            s.balances.insert(address.to_string(), balances);
        });
    }

    pub fn add_pool(&self, id: u64, denom_a: &str, denom_b: &str, reserve_account: &str) {
        self.with_state(|s| {
            s.pools.push(PoolInfo {
                id,
                type_id: 1,
                reserve_coin_denoms: vec![denom_a.to_string(), denom_b.to_string()],
                reserve_account_address: reserve_account.to_string(),
                pool_coin_denom: format!("pool{}", id),
            })
        });
    }

    /// `None` makes the params read fail
    pub fn set_swap_fee_rate(&self, rate: Option<Decimal>) {
        self.with_state(|s| s.swap_fee_rate = rate);
    }

    pub fn set_delegations(&self, delegator: &str, delegations: Vec<Delegation>) {
        self.with_state(|s| {
            s.delegations.insert(delegator.to_string(), delegations);
        });
    }

    /// Events attached to every later included transaction
    pub fn emit_events(&self, events: Vec<TxEvent>) {
        self.with_state(|s| s.events = events);
    }

    pub fn sequence(&self) -> u64 {
        self.with_state(|s| s.sequence)
    }

    pub fn simulations(&self) -> Vec<Vec<Any>> {
        self.with_state(|s| s.simulations.clone())
    }

    pub fn submissions(&self) -> Vec<Submitted> {
        self.with_state(|s| s.submissions.clone())
    }
}

#[async_trait]
impl ChainQuery for FakeChain {
    async fn balances(&self, address: &str) -> Result<Vec<Balance>> {
        Ok(self.with_state(|s| s.balances.get(address).cloned().unwrap_or_default()))
    }

    async fn pools(&self) -> Result<Vec<PoolInfo>> {
        Ok(self.with_state(|s| s.pools.clone()))
    }

    async fn liquidity_params(&self) -> Result<LiquidityParams> {
        self.with_state(|s| s.swap_fee_rate)
            .map(|swap_fee_rate| LiquidityParams { swap_fee_rate })
            .ok_or_else(|| Error::Chain("GET /cosmos/liquidity/v1beta1/params returned 501".into()))
    }

    async fn delegations(&self, delegator: &str) -> Result<Vec<Delegation>> {
        Ok(self.with_state(|s| s.delegations.get(delegator).cloned().unwrap_or_default()))
    }
}

#[async_trait]
impl TxBackend for FakeChain {
    async fn simulate(
        &self,
        _signer: &SigningIdentity,
        messages: &[Any],
        _memo: &str,
    ) -> Result<u64> {
        self.with_state(|s| {
            s.simulations.push(messages.to_vec());
            match &s.simulate_error {
                Some(message) => Err(Error::SimulationFailed(message.clone())),
                None => Ok(s.gas_used),
            }
        })
    }

    async fn committed_sequence(&self, _signer: &SigningIdentity) -> Result<u64> {
        Ok(self.with_state(|s| s.sequence))
    }

    async fn sign_and_submit(
        &self,
        _signer: &SigningIdentity,
        messages: &[Any],
        fee: &Fee,
        memo: &str,
        sequence: u64,
    ) -> Result<TxResponse> {
        tokio::task::yield_now().await;

        self.with_state(|s| {
            let expected = s.sequence + s.pending;
            if sequence != expected {
                return Ok(TxResponse {
                    hash: String::new(),
                    code: SEQUENCE_MISMATCH,
                    raw_log: format!(
                        "account sequence mismatch, expected {}, got {}",
                        expected, sequence
                    ),
                    ..TxResponse::default()
                });
            }
            s.submissions.push(Submitted {
                messages: messages.to_vec(),
                fee: fee.clone(),
                memo: memo.to_string(),
                sequence,
            });
            let hash = format!("{:064X}", sequence + 1);
            if std::mem::take(&mut s.time_out_next) {
                s.pending += 1;
                return Err(Error::InclusionTimeout {
                    tx_hash: hash,
                    waited_ms: 0,
                });
            }
            // Including this one commits everything queued ahead of it
            s.sequence = sequence + 1;
            s.pending = 0;
            Ok(TxResponse {
                hash,
                height: 1_000 + sequence,
                code: s.submit_code,
                gas_used: s.gas_used,
                gas_wanted: fee.gas_limit,
                raw_log: s.submit_log.clone(),
                events: s.events.clone(),
            })
        })
    }
}

/// Hands out the same [`FakeChain`] and counts connections
pub struct FakeConnector {
    chain: Arc<FakeChain>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new(chain: Arc<FakeChain>) -> Self {
        Self {
            chain,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TxConnector for FakeConnector {
    async fn connect(&self) -> Result<Arc<dyn TxBackend>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.chain.clone())
    }
}
