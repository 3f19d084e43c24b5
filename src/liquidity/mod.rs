//! AMM pool discovery, swap pricing and liquidity operations
//!
//! The exchange settles swaps in batches at the end of a block. A successful
//! broadcast means the order was accepted, not that it filled.

pub mod pool;
pub mod pricing;

pub use pool::Reserves;
pub use pricing::{FeeRateSource, SwapQuote};

use crate::broadcast::TxResult;
use crate::chain::{Balance, PoolInfo};
use crate::client::ClientHandle;
use crate::registry::proto::{
    Coin, MsgCreatePool, MsgDepositWithinBatch, MsgSwapWithinBatch, MsgWithdrawWithinBatch,
};
use crate::registry::ChainMessage;
use crate::{Error, Result};
use pricing::{compute_quote, dec_to_atomics, offer_coin_fee, QuoteInput};
use rust_decimal::Decimal;
use serde::Serialize;

/// Standard constant-product pool
pub const POOL_TYPE_XYK: u32 = 1;
/// Instant swap order
pub const SWAP_TYPE_INSTANT: u32 = 1;

/// Caveat attached to quotes and swap results
pub const BATCH_NOTE: &str = "Swap executes at end of block (batched); check balances after the next block";

#[derive(Debug, Clone, Serialize)]
pub struct PoolTxResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub address: String,
    pub pool_id: Option<u64>,
    pub coins: Vec<Balance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub swapper: String,
    pub pool_id: u64,
    pub offer_denom: String,
    #[serde(with = "crate::amount::as_string")]
    pub offer_amount: u128,
    pub demand_denom: String,
    pub order_price: String,
    #[serde(with = "crate::amount::as_string")]
    pub offer_coin_fee: u128,
    pub note: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapTokensResult {
    #[serde(flatten)]
    pub swap: SwapResult,
    pub quote: SwapQuote,
}

/// Two deposit coins ordered by denom, as pool messages require
fn sorted_pair(denom_a: &str, amount_a: u128, denom_b: &str, amount_b: u128) -> Result<Vec<Balance>> {
    if denom_a == denom_b {
        return Err(Error::InvalidArgument(format!(
            "Pool denoms must differ, got {} twice",
            denom_a
        )));
    }
    let mut coins = vec![Balance::new(denom_a, amount_a), Balance::new(denom_b, amount_b)];
    coins.sort_by(|a, b| a.denom.cmp(&b.denom));
    Ok(coins)
}

impl ClientHandle {
    /// Swap fee rate from chain parameters, or the configured fallback
    async fn swap_fee_rate(&self) -> (Decimal, FeeRateSource) {
        match self.query().liquidity_params().await {
            Ok(params) => (params.swap_fee_rate, FeeRateSource::Chain),
            Err(e) => self.fallback_fee_rate(&e),
        }
    }

    fn fallback_fee_rate(&self, error: &Error) -> (Decimal, FeeRateSource) {
        let fallback = self.config().swap.fallback_fee_rate;
        tracing::warn!(
            error = %error,
            fallback_fee_rate = %fallback,
            "Could not read swap fee rate, using fallback"
        );
        (fallback, FeeRateSource::Fallback)
    }

    /// Price a swap against the first pool trading the pair
    ///
    /// `slippage_percent` defaults to the configured value when `None`.
    pub async fn quote_swap(
        &self,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        slippage_percent: Option<Decimal>,
    ) -> Result<SwapQuote> {
        self.quote_with(None, offer_denom, offer_amount, demand_denom, slippage_percent)
            .await
    }

    /// Price a swap against a specific pool
    pub async fn quote_swap_in_pool(
        &self,
        pool_id: u64,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        slippage_percent: Option<Decimal>,
    ) -> Result<SwapQuote> {
        self.quote_with(
            Some(pool_id),
            offer_denom,
            offer_amount,
            demand_denom,
            slippage_percent,
        )
        .await
    }

    async fn quote_with(
        &self,
        pool_id: Option<u64>,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        slippage_percent: Option<Decimal>,
    ) -> Result<SwapQuote> {
        let slippage = slippage_percent.unwrap_or(self.config().swap.default_slippage_percent);
        self.slippage_guard().check(slippage)?;

        let query = self.query();
        let (pools, params) = tokio::join!(query.pools(), query.liquidity_params());
        let pools: Vec<PoolInfo> = pools?;
        let pool = match pool_id {
            Some(id) => pool::select_pool_by_id(&pools, id, offer_denom, demand_denom)?,
            None => pool::select_pool(&pools, offer_denom, demand_denom)?,
        };
        let (fee_rate, fee_rate_source) = match params {
            Ok(params) => (params.swap_fee_rate, FeeRateSource::Chain),
            Err(e) => self.fallback_fee_rate(&e),
        };

        let balances = query.balances(&pool.reserve_account_address).await?;
        let reserves = Reserves::from_balances(&balances, offer_denom, demand_denom);

        let quote = compute_quote(QuoteInput {
            pool_id: pool.id,
            offer_denom,
            demand_denom,
            offer_amount,
            reserves,
            slippage_percent: slippage,
            fee_rate,
            fee_rate_source,
        })?;
        tracing::debug!(
            pool_id = quote.pool_id,
            market_price = %quote.market_price,
            order_price = %quote.order_price,
            estimated_output = %quote.estimated_output,
            "Swap quoted"
        );
        Ok(quote)
    }

    /// Discover the pool, price with slippage, and submit the swap order
    pub async fn swap_tokens(
        &self,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        slippage_percent: Option<Decimal>,
    ) -> Result<SwapTokensResult> {
        let quote = self
            .quote_swap(offer_denom, offer_amount, demand_denom, slippage_percent)
            .await?;
        self.submit_quote(quote).await
    }

    /// Like [`swap_tokens`](Self::swap_tokens) against a pinned pool
    pub async fn swap_in_pool(
        &self,
        pool_id: u64,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        slippage_percent: Option<Decimal>,
    ) -> Result<SwapTokensResult> {
        let quote = self
            .quote_swap_in_pool(pool_id, offer_denom, offer_amount, demand_denom, slippage_percent)
            .await?;
        self.submit_quote(quote).await
    }

    async fn submit_quote(&self, quote: SwapQuote) -> Result<SwapTokensResult> {
        let swap = self
            .submit_swap(
                quote.pool_id,
                &quote.offer_denom,
                quote.offer_amount,
                &quote.demand_denom,
                &quote.order_price,
                quote.offer_coin_fee,
            )
            .await?;
        Ok(SwapTokensResult { swap, quote })
    }

    /// Submit a swap order at an explicit price (offer units per demand unit)
    pub async fn swap(
        &self,
        pool_id: u64,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        order_price: &str,
    ) -> Result<SwapResult> {
        let (fee_rate, _) = self.swap_fee_rate().await;
        let fee = offer_coin_fee(offer_amount, fee_rate)?;
        self.submit_swap(pool_id, offer_denom, offer_amount, demand_denom, order_price, fee)
            .await
    }

    async fn submit_swap(
        &self,
        pool_id: u64,
        offer_denom: &str,
        offer_amount: u128,
        demand_denom: &str,
        order_price: &str,
        offer_coin_fee: u128,
    ) -> Result<SwapResult> {
        if offer_amount == 0 {
            return Err(Error::InvalidArgument(
                "Offer amount must be greater than zero".to_string(),
            ));
        }
        let swapper = self.address().await?;
        let message = ChainMessage::SwapWithinBatch(MsgSwapWithinBatch {
            swap_requester_address: swapper.clone(),
            pool_id,
            swap_type_id: SWAP_TYPE_INSTANT,
            offer_coin: Some(Coin::new(offer_denom, offer_amount)),
            demand_coin_denom: demand_denom.to_string(),
            offer_coin_fee: Some(Coin::new(offer_denom, offer_coin_fee)),
            order_price: dec_to_atomics(order_price)?,
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(SwapResult {
            tx,
            swapper,
            pool_id,
            offer_denom: offer_denom.to_string(),
            offer_amount,
            demand_denom: demand_denom.to_string(),
            order_price: order_price.to_string(),
            offer_coin_fee,
            note: BATCH_NOTE,
        })
    }

    /// Create a constant-product pool seeded with both coins
    pub async fn create_pool(
        &self,
        denom_a: &str,
        amount_a: u128,
        denom_b: &str,
        amount_b: u128,
    ) -> Result<PoolTxResult> {
        let coins = sorted_pair(denom_a, amount_a, denom_b, amount_b)?;
        let creator = self.address().await?;
        let message = ChainMessage::CreatePool(MsgCreatePool {
            pool_creator_address: creator.clone(),
            pool_type_id: POOL_TYPE_XYK,
            deposit_coins: coins.iter().map(Coin::from).collect(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(PoolTxResult {
            tx,
            address: creator,
            pool_id: None,
            coins,
        })
    }

    /// Add liquidity to an existing pool
    pub async fn deposit(
        &self,
        pool_id: u64,
        denom_a: &str,
        amount_a: u128,
        denom_b: &str,
        amount_b: u128,
    ) -> Result<PoolTxResult> {
        let coins = sorted_pair(denom_a, amount_a, denom_b, amount_b)?;
        let depositor = self.address().await?;
        let message = ChainMessage::DepositWithinBatch(MsgDepositWithinBatch {
            depositor_address: depositor.clone(),
            pool_id,
            deposit_coins: coins.iter().map(Coin::from).collect(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(PoolTxResult {
            tx,
            address: depositor,
            pool_id: Some(pool_id),
            coins,
        })
    }

    /// Redeem pool coins for the underlying reserves
    pub async fn withdraw(
        &self,
        pool_id: u64,
        pool_coin_denom: &str,
        pool_coin_amount: u128,
    ) -> Result<PoolTxResult> {
        let withdrawer = self.address().await?;
        let coin = Balance::new(pool_coin_denom, pool_coin_amount);
        let message = ChainMessage::WithdrawWithinBatch(MsgWithdrawWithinBatch {
            withdrawer_address: withdrawer.clone(),
            pool_id,
            pool_coin: Some(Coin::from(&coin)),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(PoolTxResult {
            tx,
            address: withdrawer,
            pool_id: Some(pool_id),
            coins: vec![coin],
        })
    }
}
