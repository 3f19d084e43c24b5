//! Signing identity derived from a recovery phrase
//!
//! SECURITY: This is the ONLY place where private keys exist.
//! - The phrase is read, turned into a key, and dropped
//! - Keys are never serialized to JSON
//! - Keys are never logged

use crate::{Error, Result};
use bip39::{Language, Mnemonic};
use coins_bip32::path::DerivationPath;
use coins_bip32::prelude::*;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Standard Cosmos HD path (coin type 118)
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// Key pair plus the account address it controls
///
/// The signing key is:
/// - Never serialized (no Serialize impl)
/// - Only usable through [`SigningIdentity::sign`]
pub struct SigningIdentity {
    key: SigningKey,
    public_key: Vec<u8>,
    address: String,
}

impl SigningIdentity {
    /// Derive the first account of a BIP-39 English phrase
    pub fn from_mnemonic(phrase: &str, prefix: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.trim())
            .map_err(|e| Error::Wallet(format!("Invalid mnemonic: {}", e)))?;
        let seed = mnemonic.to_seed("");

        let path: DerivationPath = COSMOS_HD_PATH
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid derivation path: {:?}", e)))?;
        let master = XPriv::root_from_seed(&seed, None)
            .map_err(|e| Error::Wallet(format!("Failed to derive master key: {}", e)))?;
        let derived = master
            .derive_path(&path)
            .map_err(|e| Error::Wallet(format!("Failed to derive key: {}", e)))?;

        let key: &SigningKey = derived.as_ref();
        Self::from_signing_key(key.clone(), prefix)
    }

    fn from_signing_key(key: SigningKey, prefix: &str) -> Result<Self> {
        let public_key = key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        let address = encode_address(prefix, &hash160(&public_key))?;
        Ok(Self {
            key,
            public_key,
            address,
        })
    }

    /// Bech32 account address (safe to share)
    pub fn address(&self) -> &str {
        &self.address
    }

    /// 33-byte compressed secp256k1 public key
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Sign arbitrary bytes: SHA-256, then ECDSA with a low-S 64-byte result
    ///
    /// This is the ONLY way to use the private key.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signature: Signature = self
            .key
            .try_sign(message)
            .map_err(|e| Error::Wallet(format!("Signing failed: {}", e)))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }
}

// Implement Debug manually to avoid exposing the key
impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// RIPEMD-160 of SHA-256, the Cosmos account id of a public key
pub fn hash160(bytes: &[u8]) -> Vec<u8> {
    Ripemd160::digest(Sha256::digest(bytes)).to_vec()
}

pub fn encode_address(prefix: &str, data: &[u8]) -> Result<String> {
    let hrp = bech32::Hrp::parse(prefix)
        .map_err(|e| Error::Config(format!("Invalid address prefix '{}': {}", prefix, e)))?;
    bech32::encode::<bech32::Bech32>(hrp, data)
        .map_err(|e| Error::Wallet(format!("Address encoding failed: {}", e)))
}

/// Check that `address` is bech32 with the expected prefix
///
/// Accounts are 20 bytes, contract addresses 32.
pub fn validate_address(address: &str, prefix: &str) -> Result<()> {
    let (hrp, data) = bech32::decode(address)
        .map_err(|e| Error::InvalidArgument(format!("Invalid address '{}': {}", address, e)))?;
    if hrp.as_str() != prefix {
        return Err(Error::InvalidArgument(format!(
            "Address '{}' has prefix '{}', expected '{}'",
            address,
            hrp.as_str(),
            prefix
        )));
    }
    if data.len() != 20 && data.len() != 32 {
        return Err(Error::InvalidArgument(format!(
            "Address '{}' has unexpected length {}",
            address,
            data.len()
        )));
    }
    Ok(())
}
