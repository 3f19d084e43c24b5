//! Bostrom Transaction Execution Core
//!
//! Signs and broadcasts transactions on the Bostrom chain on behalf of an
//! agent:
//! - Derives a signing identity from a recovery phrase on first use
//! - Composes one message registry from the cosmos, cyber and token factory sets
//! - Simulates every transaction and prices gas from the simulation
//! - Serializes broadcasts per account so sequence numbers never collide
//! - Discovers AMM pools and prices limit-order swaps with slippage
//!
//! # Security Model
//!
//! - The private key never leaves [`wallet::SigningIdentity`]
//! - Outbound transfers pass a configurable spend ceiling before signing
//! - Every broadcast attempt can be appended to a JSONL audit log

pub mod amount;
pub mod broadcast;
pub mod chain;
pub mod client;
pub mod config;
pub mod fees;
pub mod guards;
pub mod liquidity;
pub mod operations;
pub mod registry;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use broadcast::TxResult;
pub use client::ClientHandle;
pub use config::{Config, Endpoints, MNEMONIC_ENV};
pub use error::{Error, Result};
pub use fees::Fee;
pub use liquidity::SwapQuote;
pub use registry::{ChainMessage, Registry};
pub use wallet::{Credentials, SigningIdentity};
