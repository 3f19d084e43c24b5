//! Constant-product swap pricing
//!
//! Prices are quoted as offer units per demand unit:
//! - market price = offer reserve / demand reserve
//! - limit price = market price × (1 + slippage / 100)
//! - estimated output = floor(offer × demand reserve / offer reserve), before fees
//! - offer coin fee = ceil(offer × swap fee rate / 2)

use super::pool::Reserves;
use super::BATCH_NOTE;
use crate::amount::{ceil_to_units, to_decimal};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// Fractional digits of an `sdk.Dec`
pub const DEC_PRECISION: u32 = 18;

/// Where the swap fee rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeRateSource {
    Chain,
    Fallback,
}

/// Everything needed to submit a limit-priced swap order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapQuote {
    pub pool_id: u64,
    pub offer_denom: String,
    pub demand_denom: String,
    #[serde(with = "crate::amount::as_string")]
    pub offer_amount: u128,
    pub reserves: Reserves,
    pub market_price: Decimal,
    pub limit_price: Decimal,
    /// Limit price with exactly 18 fractional digits
    pub order_price: String,
    #[serde(with = "crate::amount::as_string")]
    pub estimated_output: u128,
    #[serde(with = "crate::amount::as_string")]
    pub offer_coin_fee: u128,
    pub fee_rate: Decimal,
    pub fee_rate_source: FeeRateSource,
    pub slippage_percent: Decimal,
    /// Settlement happens later in a batch and may differ from this quote
    pub note: &'static str,
}

/// Inputs to [`compute_quote`]
#[derive(Debug, Clone, Copy)]
pub struct QuoteInput<'a> {
    pub pool_id: u64,
    pub offer_denom: &'a str,
    pub demand_denom: &'a str,
    pub offer_amount: u128,
    pub reserves: Reserves,
    pub slippage_percent: Decimal,
    pub fee_rate: Decimal,
    pub fee_rate_source: FeeRateSource,
}

pub fn compute_quote(input: QuoteInput<'_>) -> Result<SwapQuote> {
    let Reserves { offer, demand } = input.reserves;
    if offer == 0 || demand == 0 {
        return Err(Error::ZeroReserves {
            pool_id: input.pool_id,
        });
    }
    if input.offer_amount == 0 {
        return Err(Error::InvalidArgument(
            "Offer amount must be greater than zero".to_string(),
        ));
    }

    let market_price = to_decimal(offer)?
        .checked_div(to_decimal(demand)?)
        .ok_or_else(|| overflow("market price"))?;
    let limit_price = limit_price(market_price, input.slippage_percent)?;

    Ok(SwapQuote {
        pool_id: input.pool_id,
        offer_denom: input.offer_denom.to_string(),
        demand_denom: input.demand_denom.to_string(),
        offer_amount: input.offer_amount,
        reserves: input.reserves,
        market_price,
        limit_price,
        order_price: format_dec(limit_price),
        estimated_output: estimated_output(input.offer_amount, input.reserves)?,
        offer_coin_fee: offer_coin_fee(input.offer_amount, input.fee_rate)?,
        fee_rate: input.fee_rate,
        fee_rate_source: input.fee_rate_source,
        slippage_percent: input.slippage_percent,
        note: BATCH_NOTE,
    })
}

/// Market price raised by `slippage_percent`
pub fn limit_price(market_price: Decimal, slippage_percent: Decimal) -> Result<Decimal> {
    let factor = Decimal::ONE
        .checked_add(slippage_percent / Decimal::ONE_HUNDRED)
        .ok_or_else(|| overflow("slippage factor"))?;
    market_price
        .checked_mul(factor)
        .ok_or_else(|| overflow("limit price"))
}

/// Constant-product output before fees, rounded down
pub fn estimated_output(offer_amount: u128, reserves: Reserves) -> Result<u128> {
    if reserves.offer == 0 {
        return Err(Error::InvalidArgument("Offer reserve is zero".to_string()));
    }
    offer_amount
        .checked_mul(reserves.demand)
        .map(|product| product / reserves.offer)
        .ok_or_else(|| overflow("estimated output"))
}

/// Half the swap fee charged from the offer coin, rounded up
pub fn offer_coin_fee(offer_amount: u128, fee_rate: Decimal) -> Result<u128> {
    let fee = to_decimal(offer_amount)?
        .checked_mul(fee_rate)
        .ok_or_else(|| overflow("offer coin fee"))?
        / Decimal::TWO;
    ceil_to_units(fee)
}

/// Render a decimal with exactly 18 fractional digits
pub fn format_dec(value: Decimal) -> String {
    let rounded = value.round_dp(DEC_PRECISION).normalize();
    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };
    format!("{}.{:0<width$}", int_part, frac_part, width = DEC_PRECISION as usize)
}

/// Convert a decimal string into `sdk.Dec` atomics (value × 10^18, no point)
pub fn dec_to_atomics(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let valid = !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.len() <= DEC_PRECISION as usize;
    if !valid {
        return Err(Error::InvalidArgument(format!(
            "Invalid decimal '{}': expected a non-negative number with at most {} fractional digits",
            value, DEC_PRECISION
        )));
    }

    let digits = format!(
        "{}{:0<width$}",
        int_part,
        frac_part,
        width = DEC_PRECISION as usize
    );
    let atomics = digits.trim_start_matches('0');
    Ok(if atomics.is_empty() {
        "0".to_string()
    } else {
        atomics.to_string()
    })
}

fn overflow(what: &str) -> Error {
    Error::InvalidArgument(format!("Swap {} overflows", what))
}
