//! Cosmos LCD (REST gateway) client

use super::{Balance, ChainQuery, Delegation, LiquidityParams, PoolInfo, TxEvent, TxResponse};
use crate::amount::as_string;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Account number and next sequence of an on-chain account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// HTTP client for one LCD endpoint
#[derive(Debug, Clone)]
pub struct LcdClient {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct BalancesResponse {
    balances: Vec<Balance>,
}

#[derive(Deserialize)]
struct PoolsResponse {
    pools: Vec<PoolInfo>,
}

#[derive(Deserialize)]
struct ParamsResponse {
    params: LiquidityParams,
}

#[derive(Deserialize)]
struct DelegationsResponse {
    delegation_responses: Vec<DelegationEntry>,
}

#[derive(Deserialize)]
struct DelegationEntry {
    delegation: DelegationBody,
    balance: Balance,
}

#[derive(Deserialize)]
struct DelegationBody {
    validator_address: String,
}

#[derive(Deserialize)]
struct SimulateResponse {
    gas_info: GasInfo,
}

#[derive(Deserialize)]
struct GasInfo {
    #[serde(with = "as_string")]
    gas_used: u64,
}

#[derive(Deserialize)]
struct TxEnvelope {
    tx_response: RawTxResponse,
}

#[derive(Deserialize)]
struct RawTxResponse {
    txhash: String,
    #[serde(default, with = "as_string")]
    height: u64,
    #[serde(default)]
    code: u32,
    #[serde(default, with = "as_string")]
    gas_used: u64,
    #[serde(default, with = "as_string")]
    gas_wanted: u64,
    #[serde(default)]
    raw_log: String,
    #[serde(default)]
    events: Vec<TxEvent>,
}

impl From<RawTxResponse> for TxResponse {
    fn from(raw: RawTxResponse) -> Self {
        Self {
            hash: raw.txhash,
            height: raw.height,
            code: raw.code,
            gas_used: raw.gas_used,
            gas_wanted: raw.gas_wanted,
            raw_log: raw.raw_log,
            events: raw.events,
        }
    }
}

#[derive(Serialize)]
struct BroadcastRequest<'a> {
    tx_bytes: String,
    mode: &'a str,
}

/// Failure body returned by the gateway
enum Failure {
    NotFound(String),
    Other(StatusCode, String),
}

impl LcdClient {
    pub fn new(base: Url) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid LCD path '{}': {}", path, e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<std::result::Result<Value, Failure>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(Ok(serde_json::from_str(&body)?));
        }
        let message = error_message(&body);
        if status == StatusCode::NOT_FOUND {
            Ok(Err(Failure::NotFound(message)))
        } else {
            Ok(Err(Failure::Other(status, message)))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        match self.send(self.client.get(url)).await? {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(Failure::NotFound(message)) => Err(Error::Chain(format!(
                "GET {} returned 404: {}",
                path, message
            ))),
            Err(Failure::Other(status, message)) => Err(Error::Chain(format!(
                "GET {} returned {}: {}",
                path, status, message
            ))),
        }
    }

    /// Account number and sequence, or an error if the account does not exist yet
    pub async fn account(&self, address: &str) -> Result<AccountInfo> {
        let value: Value = self
            .get_json(&format!("/cosmos/auth/v1beta1/accounts/{}", address))
            .await?;
        parse_account(&value).ok_or_else(|| {
            Error::Chain(format!(
                "Account {} has no account_number/sequence in LCD response",
                address
            ))
        })
    }

    /// Chain id reported by the node behind this gateway
    pub async fn chain_id(&self) -> Result<String> {
        let value: Value = self
            .get_json("/cosmos/base/tendermint/v1beta1/node_info")
            .await?;
        value
            .pointer("/default_node_info/network")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Chain("node_info response has no network".to_string()))
    }

    /// Dry-run a transaction and return gas used
    pub async fn simulate_tx(&self, tx_bytes: &[u8]) -> Result<u64> {
        let url = self.url("/cosmos/tx/v1beta1/simulate")?;
        let body = json!({ "tx_bytes": encode_tx(tx_bytes) });
        match self.send(self.client.post(url).json(&body)).await? {
            Ok(value) => {
                let parsed: SimulateResponse = serde_json::from_value(value)?;
                Ok(parsed.gas_info.gas_used)
            }
            Err(Failure::NotFound(message)) | Err(Failure::Other(_, message)) => {
                Err(Error::SimulationFailed(message))
            }
        }
    }

    /// Submit a signed transaction and return the mempool check result
    pub async fn broadcast_sync(&self, tx_bytes: &[u8]) -> Result<TxResponse> {
        let url = self.url("/cosmos/tx/v1beta1/txs")?;
        let request = BroadcastRequest {
            tx_bytes: encode_tx(tx_bytes),
            mode: "BROADCAST_MODE_SYNC",
        };
        match self.send(self.client.post(url).json(&request)).await? {
            Ok(value) => {
                let envelope: TxEnvelope = serde_json::from_value(value)?;
                Ok(envelope.tx_response.into())
            }
            Err(Failure::NotFound(message)) | Err(Failure::Other(_, message)) => {
                Err(Error::Chain(format!("Broadcast failed: {}", message)))
            }
        }
    }

    /// Look up a transaction by hash; `None` while it is not yet in a block
    pub async fn get_tx(&self, hash: &str) -> Result<Option<TxResponse>> {
        let url = self.url(&format!("/cosmos/tx/v1beta1/txs/{}", hash))?;
        match self.send(self.client.get(url)).await? {
            Ok(value) => {
                let envelope: TxEnvelope = serde_json::from_value(value)?;
                Ok(Some(envelope.tx_response.into()))
            }
            Err(Failure::NotFound(_)) => Ok(None),
            Err(Failure::Other(_, message)) if message.contains("not found") => Ok(None),
            Err(Failure::Other(status, message)) => Err(Error::Chain(format!(
                "GET tx {} returned {}: {}",
                hash, status, message
            ))),
        }
    }
}

#[async_trait]
impl ChainQuery for LcdClient {
    async fn balances(&self, address: &str) -> Result<Vec<Balance>> {
        let response: BalancesResponse = self
            .get_json(&format!("/cosmos/bank/v1beta1/balances/{}", address))
            .await?;
        Ok(response.balances)
    }

    async fn pools(&self) -> Result<Vec<PoolInfo>> {
        let response: PoolsResponse = self
            .get_json("/cosmos/liquidity/v1beta1/pools?pagination.limit=200")
            .await?;
        Ok(response.pools)
    }

    async fn liquidity_params(&self) -> Result<LiquidityParams> {
        let response: ParamsResponse = self.get_json("/cosmos/liquidity/v1beta1/params").await?;
        Ok(response.params)
    }

    async fn delegations(&self, delegator: &str) -> Result<Vec<Delegation>> {
        let response: DelegationsResponse = self
            .get_json(&format!(
                "/cosmos/staking/v1beta1/delegators/{}/delegations",
                delegator
            ))
            .await?;
        Ok(response
            .delegation_responses
            .into_iter()
            .map(|entry| Delegation {
                validator_address: entry.delegation.validator_address,
                balance: entry.balance,
            })
            .collect())
    }
}

fn encode_tx(tx_bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(tx_bytes)
}

/// Prefer the gateway's `message` field, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Find account_number/sequence, including inside vesting account wrappers
fn parse_account(value: &Value) -> Option<AccountInfo> {
    match value {
        Value::Object(map) => {
            if let (Some(number), Some(sequence)) = (map.get("account_number"), map.get("sequence")) {
                return Some(AccountInfo {
                    account_number: json_u64(number)?,
                    sequence: json_u64(sequence)?,
                });
            }
            map.values().find_map(parse_account)
        }
        _ => None,
    }
}

fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_account() {
        let value = json!({
            "account": {
                "@type": "/cosmos.auth.v1beta1.BaseAccount",
                "address": "bostrom1abc",
                "account_number": "1234",
                "sequence": "56"
            }
        });
        assert_eq!(
            parse_account(&value),
            Some(AccountInfo {
                account_number: 1234,
                sequence: 56
            })
        );
    }

    #[test]
    fn parses_vesting_account() {
        let value = json!({
            "account": {
                "@type": "/cosmos.vesting.v1beta1.ContinuousVestingAccount",
                "base_vesting_account": {
                    "base_account": { "account_number": "7", "sequence": "0" }
                }
            }
        });
        assert_eq!(
            parse_account(&value),
            Some(AccountInfo {
                account_number: 7,
                sequence: 0
            })
        );
    }

    #[test]
    fn error_message_prefers_message_field() {
        let body = r#"{"code":3,"message":"out of gas in location: ReadFlat","details":[]}"#;
        assert_eq!(error_message(body), "out of gas in location: ReadFlat");
        assert_eq!(error_message("  plain text  "), "plain text");
    }

    #[test]
    fn tx_response_accepts_string_numbers() {
        let value = json!({
            "tx_response": {
                "txhash": "ABCDEF",
                "height": "123",
                "code": 5,
                "gas_used": "90000",
                "gas_wanted": "112000",
                "raw_log": "insufficient funds"
            }
        });
        let envelope: TxEnvelope = serde_json::from_value(value).unwrap();
        let response: TxResponse = envelope.tx_response.into();
        assert_eq!(response.height, 123);
        assert_eq!(response.code, 5);
        assert_eq!(response.gas_wanted, 112_000);
        assert_eq!(response.raw_log, "insufficient funds");
    }

    #[test]
    fn tx_response_keeps_events() {
        let value = json!({
            "tx_response": {
                "txhash": "ABCDEF",
                "height": "9",
                "events": [
                    { "type": "message", "attributes": [{ "key": "module", "value": "wasm" }] },
                    {
                        "type": "instantiate",
                        "attributes": [
                            { "key": "_contract_address", "value": "bostrom1contract", "index": true },
                            { "key": "code_id", "value": "12" }
                        ]
                    }
                ]
            }
        });
        let envelope: TxEnvelope = serde_json::from_value(value).unwrap();
        let response: TxResponse = envelope.tx_response.into();
        assert_eq!(response.events.len(), 2);
        assert_eq!(
            crate::chain::find_attribute(&response.events, "instantiate", "_contract_address"),
            Some("bostrom1contract")
        );
    }

    #[test]
    fn pools_response_parses_string_ids() {
        let value = json!({
            "pools": [{
                "id": "5",
                "type_id": 1,
                "reserve_coin_denoms": ["boot", "hydrogen"],
                "reserve_account_address": "bostrom1pool",
                "pool_coin_denom": "pool5"
            }],
            "pagination": { "next_key": null, "total": "1" }
        });
        let response: PoolsResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.pools[0].id, 5);
        assert_eq!(response.pools[0].reserve_coin_denoms, vec!["boot", "hydrogen"]);
    }

    #[test]
    fn url_joins_under_base_path() {
        let client = LcdClient::new(Url::parse("http://localhost:1317/").unwrap()).unwrap();
        assert_eq!(
            client.url("/cosmos/liquidity/v1beta1/params").unwrap().as_str(),
            "http://localhost:1317/cosmos/liquidity/v1beta1/params"
        );
    }
}
