//! Chain endpoint configuration
//!
//! Resolution order:
//! 1. `BOSTROM_RPC` / `BOSTROM_LCD` env vars - highest priority
//! 2. Values from a config file
//! 3. Public cybernode endpoints - rate limited, for testing only
//!
//! ```bash
//! export BOSTROM_RPC="https://rpc.my-node.example"
//! export BOSTROM_LCD="https://lcd.my-node.example"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable names
pub mod env_vars {
    pub const RPC: &str = "BOSTROM_RPC";
    pub const LCD: &str = "BOSTROM_LCD";
}

/// Public endpoints (rate limited, for testing only)
pub mod public_endpoints {
    pub const RPC: &str = "https://rpc.bostrom.cybernode.ai";
    pub const LCD: &str = "https://lcd.bostrom.cybernode.ai";
}

/// Remote node addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Tendermint RPC, used to discover the chain id
    pub rpc: String,
    /// REST (LCD) gateway for queries, simulation and broadcast
    pub lcd: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rpc: public_endpoints::RPC.to_string(),
            lcd: public_endpoints::LCD.to_string(),
        }
    }
}

impl Endpoints {
    /// Public defaults overridden by `BOSTROM_RPC` / `BOSTROM_LCD`
    pub fn from_env() -> Self {
        let mut endpoints = Self::default();
        endpoints.apply_overrides(|key| std::env::var(key).ok());
        endpoints
    }

    /// Apply overrides from a key lookup, warning when public endpoints remain
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env_vars::RPC) {
            tracing::debug!("Using {} for RPC", env_vars::RPC);
            self.rpc = url;
        }
        if let Some(url) = lookup(env_vars::LCD) {
            tracing::debug!("Using {} for LCD", env_vars::LCD);
            self.lcd = url;
        }

        if self.rpc == public_endpoints::RPC || self.lcd == public_endpoints::LCD {
            tracing::warn!("No private endpoint configured, using public cybernode endpoints (rate limited)");
        }
    }

    /// Create with explicit URLs
    pub fn with_urls(rpc: impl Into<String>, lcd: impl Into<String>) -> Self {
        Self {
            rpc: rpc.into(),
            lcd: lcd.into(),
        }
    }

    pub fn rpc_url(&self) -> Result<Url> {
        parse_base(&self.rpc, env_vars::RPC)
    }

    pub fn lcd_url(&self) -> Result<Url> {
        parse_base(&self.lcd, env_vars::LCD)
    }
}

/// Parse an endpoint as a base URL that relative paths can be joined onto
fn parse_base(raw: &str, name: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid {} endpoint '{}': {}", name, raw, e)))
}
