//! Configuration for the transaction core

pub mod endpoints;

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use endpoints::Endpoints;

/// Secret recovery phrase for the signing identity
pub const MNEMONIC_ENV: &str = "BOSTROM_MNEMONIC";
/// Chain id override (otherwise discovered from the RPC node on connect)
pub const CHAIN_ID_ENV: &str = "BOSTROM_CHAIN_ID";
/// Gas price in `<amount><denom>` form, e.g. `0.01boot`
pub const GAS_PRICE_ENV: &str = "BOSTROM_GAS_PRICE";
/// Safety multiplier applied to simulated gas
pub const GAS_MULTIPLIER_ENV: &str = "BOSTROM_GAS_MULTIPLIER";
/// Minimum gas limit for any transaction
pub const MIN_GAS_ENV: &str = "BOSTROM_MIN_GAS";
/// Ceiling for a single outbound transfer, in base units
pub const MAX_SEND_AMOUNT_ENV: &str = "BOSTROM_MAX_SEND_AMOUNT";

/// Chain identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSettings {
    /// Chain id used in sign docs; discovered from the node when unset
    #[serde(default)]
    pub chain_id: Option<String>,
    /// Bech32 prefix for account addresses
    pub address_prefix: String,
    /// Denom fees are paid in
    pub fee_denom: String,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            chain_id: None,
            address_prefix: "bostrom".to_string(),
            fee_denom: "boot".to_string(),
        }
    }
}

/// Gas and fee estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    /// Multiplier over simulated gas (1.4 = 40% margin)
    pub multiplier: Decimal,
    /// Floor for the gas limit
    pub min_gas: u64,
    /// Fee tokens charged per unit of gas limit
    pub price_per_gas: Decimal,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            multiplier: Decimal::new(14, 1),
            min_gas: 100_000,
            price_per_gas: Decimal::new(1, 2),
        }
    }
}

/// Outbound spend and slippage ceilings
///
/// Amounts are base-unit integer strings so large balances survive JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Ceiling applied to every denom without its own entry
    #[serde(default)]
    pub max_send_amount: Option<String>,
    /// Per-denom ceilings, taking precedence over `max_send_amount`
    #[serde(default)]
    pub per_denom: HashMap<String, String>,
    /// Maximum slippage tolerance a swap may request (e.g. 5 for 5%)
    #[serde(default)]
    pub max_slippage_percent: Option<Decimal>,
}

/// Swap pricing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Fee rate used when the exchange parameters cannot be read
    pub fallback_fee_rate: Decimal,
    /// Slippage tolerance used when the caller gives none
    pub default_slippage_percent: Decimal,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            fallback_fee_rate: Decimal::new(3, 3),
            default_slippage_percent: Decimal::from(3),
        }
    }
}

/// Inclusion polling after a transaction is accepted into the mempool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3_000,
            timeout_ms: 60_000,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub chain: ChainSettings,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub swap: SwapConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    /// Path to the JSONL broadcast audit log
    #[serde(default)]
    pub audit_log_path: Option<String>,
}

impl Config {
    /// Defaults overridden by `BOSTROM_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            endpoints: Endpoints::from_env(),
            ..Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a JSON config file; environment variables still take precedence
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.endpoints.apply_overrides(|key| std::env::var(key).ok());
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup(CHAIN_ID_ENV) {
            self.chain.chain_id = Some(chain_id);
        }
        if let Some(raw) = lookup(GAS_PRICE_ENV) {
            let (price, denom) = parse_gas_price(&raw)?;
            self.gas.price_per_gas = price;
            self.chain.fee_denom = denom;
        }
        if let Some(raw) = lookup(GAS_MULTIPLIER_ENV) {
            self.gas.multiplier = raw.trim().parse().map_err(|e| {
                Error::Config(format!("Invalid {} '{}': {}", GAS_MULTIPLIER_ENV, raw, e))
            })?;
        }
        if let Some(raw) = lookup(MIN_GAS_ENV) {
            self.gas.min_gas = raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", MIN_GAS_ENV, raw, e)))?;
        }
        if let Some(raw) = lookup(MAX_SEND_AMOUNT_ENV) {
            self.limits.max_send_amount = Some(raw);
        }
        self.validate()
    }

    /// Reject values that would make fee or limit computation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.gas.multiplier < Decimal::ONE {
            return Err(Error::Config(format!(
                "Gas multiplier must be at least 1, got {}",
                self.gas.multiplier
            )));
        }
        if self.gas.price_per_gas.is_sign_negative() {
            return Err(Error::Config(format!(
                "Gas price must not be negative, got {}",
                self.gas.price_per_gas
            )));
        }
        if self.swap.fallback_fee_rate.is_sign_negative()
            || self.swap.fallback_fee_rate >= Decimal::ONE
        {
            return Err(Error::Config(format!(
                "Fallback swap fee rate must be in [0, 1), got {}",
                self.swap.fallback_fee_rate
            )));
        }
        if self.chain.address_prefix.is_empty() {
            return Err(Error::Config("Address prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Split a gas price like `0.01boot` into its amount and denom
pub fn parse_gas_price(raw: &str) -> Result<(Decimal, String)> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| Error::Config(format!("Gas price '{}' has no denom", raw)))?;
    let (amount, denom) = trimmed.split_at(split);
    let price: Decimal = amount
        .parse()
        .map_err(|e| Error::Config(format!("Invalid gas price '{}': {}", raw, e)))?;
    if price.is_sign_negative() {
        return Err(Error::Config(format!("Gas price '{}' is negative", raw)));
    }
    Ok((price, denom.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_chain_conventions() {
        let config = Config::default();
        assert_eq!(config.gas.multiplier, Decimal::new(14, 1));
        assert_eq!(config.gas.min_gas, 100_000);
        assert_eq!(config.gas.price_per_gas, Decimal::new(1, 2));
        assert_eq!(config.chain.fee_denom, "boot");
        assert_eq!(config.swap.fallback_fee_rate, Decimal::new(3, 3));
        assert!(config.limits.max_send_amount.is_none());
    }

    #[test]
    fn parse_gas_price_splits_amount_and_denom() {
        let (price, denom) = parse_gas_price("0.01boot").unwrap();
        assert_eq!(price, Decimal::new(1, 2));
        assert_eq!(denom, "boot");

        assert!(parse_gas_price("0.01").is_err());
        assert!(parse_gas_price("boot").is_err());
    }

    #[test]
    fn overrides_apply_to_gas_and_limits() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                (GAS_PRICE_ENV, "0.025hydrogen"),
                (GAS_MULTIPLIER_ENV, "1.6"),
                (MIN_GAS_ENV, "200000"),
                (MAX_SEND_AMOUNT_ENV, "5000"),
                (CHAIN_ID_ENV, "bostrom"),
            ]))
            .unwrap();

        assert_eq!(config.gas.price_per_gas, Decimal::new(25, 3));
        assert_eq!(config.chain.fee_denom, "hydrogen");
        assert_eq!(config.gas.multiplier, Decimal::new(16, 1));
        assert_eq!(config.gas.min_gas, 200_000);
        assert_eq!(config.limits.max_send_amount.as_deref(), Some("5000"));
        assert_eq!(config.chain.chain_id.as_deref(), Some("bostrom"));
    }

    #[test]
    fn invalid_override_is_a_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[(MIN_GAS_ENV, "lots")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn multiplier_below_one_is_rejected() {
        let mut config = Config::default();
        config.gas.multiplier = Decimal::new(9, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_file_deserializes_with_defaults() {
        let value = serde_json::json!({
            "gas": { "multiplier": "1.5", "min_gas": 120000, "price_per_gas": "0.01" },
            "limits": { "per_denom": { "boot": "1000000" }, "max_slippage_percent": "5" }
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.gas.multiplier, Decimal::new(15, 1));
        assert_eq!(parsed.limits.per_denom["boot"], "1000000");
        assert_eq!(parsed.limits.max_slippage_percent, Some(Decimal::from(5)));
        assert_eq!(parsed.chain.address_prefix, "bostrom");
        assert_eq!(parsed.broadcast.timeout_ms, 60_000);
    }

    #[test]
    fn from_file_reads_json() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "audit_log_path": "audit.jsonl" }}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.audit_log_path.as_deref(), Some("audit.jsonl"));
    }
}
