//! Pool discovery
//!
//! Pools are matched on their unordered reserve denom pair. When the listing
//! holds more than one pool for a pair, the first one listed is used and every
//! candidate id is logged; callers who care pin a pool id instead.

use crate::chain::{Balance, PoolInfo};
use crate::{Error, Result};
use serde::Serialize;

/// Reserve amounts oriented by swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reserves {
    #[serde(with = "crate::amount::as_string")]
    pub offer: u128,
    #[serde(with = "crate::amount::as_string")]
    pub demand: u128,
}

impl Reserves {
    /// Read both sides from the pool account's balances; a missing denom is zero
    pub fn from_balances(balances: &[Balance], offer_denom: &str, demand_denom: &str) -> Self {
        let amount_of = |denom: &str| {
            balances
                .iter()
                .find(|b| b.denom == denom)
                .map(|b| b.amount)
                .unwrap_or(0)
        };
        Self {
            offer: amount_of(offer_denom),
            demand: amount_of(demand_denom),
        }
    }
}

/// Whether the pool trades exactly this pair, in either order
pub fn trades_pair(pool: &PoolInfo, denom_a: &str, denom_b: &str) -> bool {
    match pool.reserve_coin_denoms.as_slice() {
        [x, y] => (x == denom_a && y == denom_b) || (x == denom_b && y == denom_a),
        _ => false,
    }
}

/// First pool in listing order trading the pair
pub fn select_pool(pools: &[PoolInfo], offer_denom: &str, demand_denom: &str) -> Result<PoolInfo> {
    let candidates: Vec<&PoolInfo> = pools
        .iter()
        .filter(|p| trades_pair(p, offer_denom, demand_denom))
        .collect();

    match candidates.as_slice() {
        [] => Err(Error::PoolNotFound {
            offer_denom: offer_denom.to_string(),
            demand_denom: demand_denom.to_string(),
        }),
        [only] => Ok((*only).clone()),
        [first, ..] => {
            let ids: Vec<u64> = candidates.iter().map(|p| p.id).collect();
            tracing::warn!(
                offer_denom,
                demand_denom,
                candidates = ?ids,
                selected = first.id,
                "Multiple pools trade this pair, using the first listed"
            );
            Ok((*first).clone())
        }
    }
}

/// The pool with `pool_id`, which must trade the pair
pub fn select_pool_by_id(
    pools: &[PoolInfo],
    pool_id: u64,
    offer_denom: &str,
    demand_denom: &str,
) -> Result<PoolInfo> {
    let pool = pools
        .iter()
        .find(|p| p.id == pool_id)
        .ok_or_else(|| Error::PoolNotFound {
            offer_denom: offer_denom.to_string(),
            demand_denom: demand_denom.to_string(),
        })?;
    if !trades_pair(pool, offer_denom, demand_denom) {
        return Err(Error::InvalidArgument(format!(
            "Pool {} trades {}, not {}/{}",
            pool_id,
            pool.reserve_coin_denoms.join("/"),
            offer_denom,
            demand_denom
        )));
    }
    Ok(pool.clone())
}
