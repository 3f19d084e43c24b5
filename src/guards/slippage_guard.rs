//! Slippage guard
//!
//! Blocks swaps that request more slippage than the configured maximum.

use crate::{Error, Result};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlippageGuard {
    /// Maximum allowed slippage (e.g. 5 for 5%); `None` disables the ceiling
    max_slippage_percent: Option<Decimal>,
}

impl SlippageGuard {
    pub fn new(max_slippage_percent: Option<Decimal>) -> Self {
        Self {
            max_slippage_percent,
        }
    }

    pub fn check(&self, requested: Decimal) -> Result<()> {
        if requested.is_sign_negative() && !requested.is_zero() {
            return Err(Error::InvalidArgument(format!(
                "Slippage must not be negative, got {}%",
                requested
            )));
        }

        if let Some(max) = self.max_slippage_percent {
            if requested > max {
                return Err(Error::SlippageExceedsLimit {
                    requested: requested.to_string(),
                    max: max.to_string(),
                });
            }
        }

        tracing::debug!(
            requested_slippage = %requested,
            max_slippage = ?self.max_slippage_percent,
            "Slippage check passed"
        );
        Ok(())
    }
}
