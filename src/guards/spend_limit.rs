//! Spend circuit breaker
//!
//! Refuses outbound transfers above a configured ceiling. A per-denom ceiling
//! takes precedence over the global one; with neither configured, every
//! amount passes. An amount equal to the ceiling passes.

use crate::amount::parse_amount;
use crate::config::LimitsConfig;
use crate::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendLimit {
    max_send_amount: Option<u128>,
    per_denom: HashMap<String, u128>,
}

impl SpendLimit {
    /// No ceiling at all
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn global(ceiling: u128) -> Self {
        Self {
            max_send_amount: Some(ceiling),
            per_denom: HashMap::new(),
        }
    }

    pub fn with_denom(mut self, denom: impl Into<String>, ceiling: u128) -> Self {
        self.per_denom.insert(denom.into(), ceiling);
        self
    }

    pub fn from_config(limits: &LimitsConfig) -> Result<Self> {
        let max_send_amount = limits
            .max_send_amount
            .as_deref()
            .map(|raw| parse_ceiling(raw, "max_send_amount"))
            .transpose()?;
        let per_denom = limits
            .per_denom
            .iter()
            .map(|(denom, raw)| Ok((denom.clone(), parse_ceiling(raw, denom)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self {
            max_send_amount,
            per_denom,
        })
    }

    pub fn ceiling_for(&self, denom: &str) -> Option<u128> {
        self.per_denom.get(denom).copied().or(self.max_send_amount)
    }

    /// Fail with `AmountExceedsLimit` when `amount` is above the denom's ceiling
    pub fn check(&self, amount: u128, denom: &str) -> Result<()> {
        let Some(ceiling) = self.ceiling_for(denom) else {
            return Ok(());
        };
        if amount > ceiling {
            return Err(Error::AmountExceedsLimit {
                amount,
                denom: denom.to_string(),
                ceiling,
            });
        }
        tracing::debug!(amount = %amount, denom, ceiling = %ceiling, "Spend limit check passed");
        Ok(())
    }
}

fn parse_ceiling(raw: &str, name: &str) -> Result<u128> {
    parse_amount(raw).map_err(|_| {
        Error::Config(format!(
            "Spend ceiling for {} must be an unsigned integer, got '{}'",
            name, raw
        ))
    })
}
