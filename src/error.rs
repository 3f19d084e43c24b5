//! Error types for the transaction core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "{var} environment variable is not set. Write operations require a wallet. \
         Set {var} to enable signing."
    )]
    MissingCredential { var: &'static str },

    #[error(
        "Amount {amount} {denom} exceeds the configured send ceiling ({ceiling}). \
         Increase the limit or reduce the amount."
    )]
    AmountExceedsLimit {
        amount: u128,
        denom: String,
        ceiling: u128,
    },

    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Transaction failed (code {code}): {raw_log}")]
    TransactionRejected { code: u32, raw_log: String },

    #[error(
        "No liquidity pool found for {offer_denom}/{demand_denom}. \
         Check the available pools on the exchange."
    )]
    PoolNotFound {
        offer_denom: String,
        demand_denom: String,
    },

    #[error("Pool {pool_id} has zero reserves")]
    ZeroReserves { pool_id: u64 },

    #[error("Requested slippage {requested}% exceeds maximum allowed {max}%")]
    SlippageExceedsLimit { requested: String, max: String },

    #[error("Transaction {tx_hash} was submitted but not included within {waited_ms} ms")]
    InclusionTimeout { tx_hash: String, waited_ms: u64 },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Chain endpoint error: {0}")]
    Chain(String),

    #[error("Unknown message type URL: {0}")]
    UnknownTypeUrl(String),

    #[error("Message encoding failed: {0}")]
    Encode(String),

    #[error("Message decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingCredential { .. } => "missing_credential",
            Error::AmountExceedsLimit { .. } => "amount_exceeds_limit",
            Error::SimulationFailed(_) => "simulation_failed",
            Error::TransactionRejected { .. } => "transaction_rejected",
            Error::PoolNotFound { .. } => "pool_not_found",
            Error::ZeroReserves { .. } => "zero_reserves",
            Error::SlippageExceedsLimit { .. } => "slippage_exceeds_limit",
            Error::InclusionTimeout { .. } => "inclusion_timeout",
            Error::Wallet(_) => "wallet",
            Error::Config(_) => "config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Chain(_) => "chain",
            Error::UnknownTypeUrl(_) => "unknown_type_url",
            Error::Encode(_) => "encode",
            Error::Decode(_) => "decode",
            Error::Network(_) => "network",
            Error::Json(_) => "json",
            Error::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
