//! Gas and fee estimation
//!
//! `gas_limit = max(ceil(simulated × multiplier), min_gas)` and
//! `fee = ceil(gas_limit × price_per_gas)` in the configured fee denom.

use crate::amount::{ceil_to_units, to_decimal};
use crate::chain::TxBackend;
use crate::config::{ChainSettings, GasConfig};
use crate::registry::proto::{Any, Coin};
use crate::wallet::SigningIdentity;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// Fee attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fee {
    pub denom: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub gas_limit: u64,
}

impl Fee {
    pub fn coins(&self) -> Vec<Coin> {
        vec![Coin::new(self.denom.clone(), self.amount)]
    }
}

/// Gas limit for a simulated usage
pub fn gas_limit_for(simulated: u64, gas: &GasConfig) -> Result<u64> {
    let scaled = Decimal::from(simulated)
        .checked_mul(gas.multiplier)
        .ok_or_else(|| Error::InvalidArgument(format!("Gas estimate {} overflows", simulated)))?;
    let scaled = u64::try_from(ceil_to_units(scaled)?)
        .map_err(|_| Error::InvalidArgument(format!("Gas limit for {} overflows", simulated)))?;
    Ok(scaled.max(gas.min_gas))
}

/// Fee for a simulated gas usage
pub fn fee_for_gas(simulated: u64, gas: &GasConfig, fee_denom: &str) -> Result<Fee> {
    let gas_limit = gas_limit_for(simulated, gas)?;
    let amount = to_decimal(gas_limit as u128)?
        .checked_mul(gas.price_per_gas)
        .ok_or_else(|| Error::InvalidArgument(format!("Fee for gas {} overflows", gas_limit)))?;
    Ok(Fee {
        denom: fee_denom.to_string(),
        amount: ceil_to_units(amount)?,
        gas_limit,
    })
}

/// Simulate `messages` and derive the fee for them
///
/// Fails with `SimulationFailed` when the dry run does; nothing is submitted.
pub async fn estimate_fee(
    backend: &dyn TxBackend,
    signer: &SigningIdentity,
    messages: &[Any],
    memo: &str,
    gas: &GasConfig,
    chain: &ChainSettings,
) -> Result<Fee> {
    let simulated = backend.simulate(signer, messages, memo).await?;
    let fee = fee_for_gas(simulated, gas, &chain.fee_denom)?;
    tracing::debug!(
        simulated,
        gas_limit = fee.gas_limit,
        fee = %fee.amount,
        denom = %fee.denom,
        "Estimated fee"
    );
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_multiplier_and_price() {
        let fee = fee_for_gas(80_000, &GasConfig::default(), "boot").unwrap();
        assert_eq!(fee.gas_limit, 112_000);
        assert_eq!(fee.amount, 1_120);
        assert_eq!(fee.denom, "boot");
    }

    #[test]
    fn small_estimates_use_the_floor() {
        let fee = fee_for_gas(50_000, &GasConfig::default(), "boot").unwrap();
        assert_eq!(fee.gas_limit, 100_000);
        assert_eq!(fee.amount, 1_000);

        let fee = fee_for_gas(0, &GasConfig::default(), "boot").unwrap();
        assert_eq!(fee.gas_limit, 100_000);
    }

    #[test]
    fn rounds_up_partial_units() {
        // 71_429 × 1.4 = 100_000.6 -> 100_001; fee 1000.01 -> 1001
        let fee = fee_for_gas(71_429, &GasConfig::default(), "boot").unwrap();
        assert_eq!(fee.gas_limit, 100_001);
        assert_eq!(fee.amount, 1_001);
    }

    #[test]
    fn formula_holds_across_estimates() {
        let gas = GasConfig::default();
        for simulated in (0..2_000_000u64).step_by(7_919) {
            let fee = fee_for_gas(simulated, &gas, "boot").unwrap();
            // ceil(g × 14 / 10), floored at 100_000
            let expected_limit = ((simulated * 14 + 9) / 10).max(100_000);
            assert_eq!(fee.gas_limit, expected_limit, "gas limit for {}", simulated);
            // ceil(limit / 100)
            let expected_fee = (expected_limit as u128 + 99) / 100;
            assert_eq!(fee.amount, expected_fee, "fee for {}", simulated);
            assert!(fee.gas_limit >= simulated);
        }
    }

    #[test]
    fn custom_price_and_denom() {
        let gas = GasConfig {
            multiplier: Decimal::new(15, 1),
            min_gas: 10,
            price_per_gas: Decimal::new(25, 3),
        };
        let fee = fee_for_gas(1_000, &gas, "hydrogen").unwrap();
        assert_eq!(fee.gas_limit, 1_500);
        // 1500 × 0.025 = 37.5 -> 38
        assert_eq!(fee.amount, 38);
        assert_eq!(fee.coins(), vec![Coin::new("hydrogen", 38)]);
    }
}
