//! Key management and transaction assembly
//!
//! The private key NEVER leaves [`SigningIdentity`]. Everything else in this
//! module works with public keys and bytes.

mod signer;
pub mod tx_builder;

pub use signer::{encode_address, hash160, validate_address, SigningIdentity, COSMOS_HD_PATH};
pub use tx_builder::UnsignedTx;

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Where the recovery phrase comes from
///
/// The phrase is only read when a signing identity is first needed, so
/// read-only use works without any secret configured.
pub enum Credentials {
    /// Read from the named environment variable at first use
    Env(&'static str),
    /// Phrase supplied directly
    Phrase(SecretString),
}

impl Credentials {
    pub fn from_env() -> Self {
        Credentials::Env(crate::config::MNEMONIC_ENV)
    }

    pub fn phrase(phrase: impl Into<String>) -> Self {
        Credentials::Phrase(SecretString::from(phrase.into()))
    }

    /// Derive the signing identity
    pub fn derive(&self, prefix: &str) -> Result<SigningIdentity> {
        match self {
            Credentials::Env(var) => {
                let phrase = std::env::var(var)
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .ok_or(Error::MissingCredential { var })?;
                SigningIdentity::from_mnemonic(&phrase, prefix)
            }
            Credentials::Phrase(secret) => {
                SigningIdentity::from_mnemonic(secret.expose_secret(), prefix)
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Credentials::Phrase(_) => f.debug_tuple("Phrase").field(&"[REDACTED]").finish(),
        }
    }
}
