//! Token factory denoms: create, mint, burn, hand over admin

use super::{require_non_empty, require_positive};
use crate::broadcast::TxResult;
use crate::client::ClientHandle;
use crate::registry::proto::{Coin, MsgBurn, MsgChangeAdmin, MsgCreateDenom, MsgMint};
use crate::registry::ChainMessage;
use crate::Result;
use serde::Serialize;

/// Full denom minted by the factory for `creator`
pub fn factory_denom(creator: &str, subdenom: &str) -> String {
    format!("factory/{}/{}", creator, subdenom)
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDenomResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub denom: String,
    pub sender: String,
}

/// Mint or burn outcome
#[derive(Debug, Clone, Serialize)]
pub struct SupplyResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub denom: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    /// Recipient of a mint, or the account burned from
    pub account: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub denom: String,
    pub new_admin: String,
}

impl ClientHandle {
    pub async fn create_denom(&self, subdenom: &str) -> Result<CreateDenomResult> {
        require_non_empty(subdenom, "Subdenom")?;
        let sender = self.address().await?;
        let message = ChainMessage::CreateDenom(MsgCreateDenom {
            sender: sender.clone(),
            subdenom: subdenom.to_string(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(CreateDenomResult {
            tx,
            denom: factory_denom(&sender, subdenom),
            sender,
        })
    }

    /// Mint to `mint_to`, or to the signer when `None`
    pub async fn mint_tokens(
        &self,
        denom: &str,
        amount: u128,
        mint_to: Option<&str>,
    ) -> Result<SupplyResult> {
        require_positive(amount, "Mint amount")?;
        let sender = self.address().await?;
        let account = mint_to.unwrap_or(&sender).to_string();
        let message = ChainMessage::Mint(MsgMint {
            sender,
            amount: Some(Coin::new(denom, amount)),
            mint_to_address: account.clone(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(SupplyResult {
            tx,
            denom: denom.to_string(),
            amount,
            account,
        })
    }

    /// Burn from `burn_from`, or from the signer when `None`
    pub async fn burn_tokens(
        &self,
        denom: &str,
        amount: u128,
        burn_from: Option<&str>,
    ) -> Result<SupplyResult> {
        require_positive(amount, "Burn amount")?;
        let sender = self.address().await?;
        let account = burn_from.unwrap_or(&sender).to_string();
        let message = ChainMessage::Burn(MsgBurn {
            sender,
            amount: Some(Coin::new(denom, amount)),
            burn_from_address: account.clone(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(SupplyResult {
            tx,
            denom: denom.to_string(),
            amount,
            account,
        })
    }

    pub async fn change_admin(&self, denom: &str, new_admin: &str) -> Result<AdminResult> {
        require_non_empty(new_admin, "New admin")?;
        let sender = self.address().await?;
        let message = ChainMessage::ChangeAdmin(MsgChangeAdmin {
            sender,
            denom: denom.to_string(),
            new_admin: new_admin.to_string(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(AdminResult {
            tx,
            denom: denom.to_string(),
            new_admin: new_admin.to_string(),
        })
    }
}
