//! Transaction backend over the LCD gateway

use super::lcd::LcdClient;
use super::{TxBackend, TxConnector, TxResponse};
use crate::config::{BroadcastConfig, ChainSettings, Endpoints};
use crate::fees::Fee;
use crate::registry::proto::Any;
use crate::wallet::{SigningIdentity, UnsignedTx};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Signs with SIGN_MODE_DIRECT and submits through an LCD endpoint
#[derive(Debug, Clone)]
pub struct LcdTxBackend {
    lcd: LcdClient,
    chain_id: String,
    broadcast: BroadcastConfig,
}

impl LcdTxBackend {
    pub fn new(lcd: LcdClient, chain_id: impl Into<String>, broadcast: BroadcastConfig) -> Self {
        Self {
            lcd,
            chain_id: chain_id.into(),
            broadcast,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Poll until the transaction lands in a block or the timeout passes
    async fn wait_for_inclusion(&self, hash: &str) -> Result<TxResponse> {
        let interval = Duration::from_millis(self.broadcast.poll_interval_ms.max(1));
        let timeout = Duration::from_millis(self.broadcast.timeout_ms);
        let started = Instant::now();

        loop {
            if let Some(response) = self.lcd.get_tx(hash).await? {
                tracing::info!(
                    tx_hash = %hash,
                    height = response.height,
                    code = response.code,
                    "Transaction included"
                );
                return Ok(response);
            }
            if started.elapsed() >= timeout {
                return Err(Error::InclusionTimeout {
                    tx_hash: hash.to_string(),
                    waited_ms: self.broadcast.timeout_ms,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[async_trait]
impl TxBackend for LcdTxBackend {
    async fn simulate(
        &self,
        signer: &SigningIdentity,
        messages: &[Any],
        memo: &str,
    ) -> Result<u64> {
        let account = self.lcd.account(signer.address()).await?;
        let unsigned = UnsignedTx::new(
            messages,
            memo,
            signer.public_key(),
            account.sequence,
            Vec::new(),
            0,
        );
        self.lcd.simulate_tx(&unsigned.into_simulation()).await
    }

    async fn committed_sequence(&self, signer: &SigningIdentity) -> Result<u64> {
        Ok(self.lcd.account(signer.address()).await?.sequence)
    }

    async fn sign_and_submit(
        &self,
        signer: &SigningIdentity,
        messages: &[Any],
        fee: &Fee,
        memo: &str,
        sequence: u64,
    ) -> Result<TxResponse> {
        let account = self.lcd.account(signer.address()).await?;
        let unsigned = UnsignedTx::new(
            messages,
            memo,
            signer.public_key(),
            sequence,
            fee.coins(),
            fee.gas_limit,
        );
        let signature = signer.sign(&unsigned.sign_doc_bytes(&self.chain_id, account.account_number))?;
        let tx_bytes = unsigned.into_raw(signature);

        let checked = self.lcd.broadcast_sync(&tx_bytes).await?;
        tracing::info!(
            tx_hash = %checked.hash,
            sequence,
            committed_sequence = account.sequence,
            code = checked.code,
            "Transaction broadcast"
        );
        if checked.code != 0 {
            return Ok(checked);
        }
        self.wait_for_inclusion(&checked.hash).await
    }
}

/// Builds an [`LcdTxBackend`], discovering the chain id when not configured
#[derive(Debug, Clone)]
pub struct LcdConnector {
    endpoints: Endpoints,
    chain: ChainSettings,
    broadcast: BroadcastConfig,
}

impl LcdConnector {
    pub fn new(endpoints: Endpoints, chain: ChainSettings, broadcast: BroadcastConfig) -> Self {
        Self {
            endpoints,
            chain,
            broadcast,
        }
    }

    /// Chain id from the RPC node's `/status`, falling back to the LCD node info
    async fn discover_chain_id(&self, lcd: &LcdClient) -> Result<String> {
        match self.rpc_chain_id().await {
            Ok(chain_id) => Ok(chain_id),
            Err(e) => {
                tracing::warn!(error = %e, "RPC status unavailable, reading chain id from LCD");
                lcd.chain_id().await
            }
        }
    }

    async fn rpc_chain_id(&self) -> Result<String> {
        let url = self
            .endpoints
            .rpc_url()?
            .join("status")
            .map_err(|e| Error::Config(format!("Invalid RPC status URL: {}", e)))?;
        let response = reqwest::Client::new().get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Chain(format!("RPC status returned {}", response.status())));
        }
        let value: Value = response.json().await?;
        let status = value.get("result").unwrap_or(&value);
        status
            .pointer("/node_info/network")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Chain("RPC status has no node_info.network".to_string()))
    }
}

#[async_trait]
impl TxConnector for LcdConnector {
    async fn connect(&self) -> Result<Arc<dyn TxBackend>> {
        let lcd = LcdClient::new(self.endpoints.lcd_url()?)?;
        let chain_id = match &self.chain.chain_id {
            Some(chain_id) => chain_id.clone(),
            None => self.discover_chain_id(&lcd).await?,
        };
        tracing::info!(chain_id = %chain_id, lcd = %lcd.base(), "Connected transaction backend");
        Ok(Arc::new(LcdTxBackend::new(lcd, chain_id, self.broadcast.clone())))
    }
}
