//! Energy grid: routing volt and ampere to other accounts

use super::require_non_empty;
use crate::broadcast::TxResult;
use crate::chain::Balance;
use crate::client::ClientHandle;
use crate::registry::proto::{Coin, MsgCreateRoute, MsgDeleteRoute, MsgEditRoute};
use crate::registry::ChainMessage;
use crate::wallet::validate_address;
use crate::{Error, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Balance>,
}

impl ClientHandle {
    /// Destination checked against the chain prefix and the signer itself
    async fn route_endpoints(&self, destination: &str) -> Result<(String, String)> {
        require_non_empty(destination, "Route destination")?;
        validate_address(destination, &self.config().chain.address_prefix)?;
        let source = self.address().await?;
        if source == destination {
            return Err(Error::InvalidArgument(
                "Route destination must differ from the source".to_string(),
            ));
        }
        Ok((source, destination.to_string()))
    }

    /// Open a named route to `destination`
    pub async fn create_route(&self, destination: &str, name: &str) -> Result<RouteResult> {
        require_non_empty(name, "Route name")?;
        let (source, destination) = self.route_endpoints(destination).await?;
        let message = ChainMessage::CreateRoute(MsgCreateRoute {
            source: source.clone(),
            destination: destination.clone(),
            name: name.to_string(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(RouteResult {
            tx,
            source,
            destination,
            name: Some(name.to_string()),
            value: None,
        })
    }

    /// Set how much of `denom` the route carries; zero stops the flow
    pub async fn edit_route(
        &self,
        destination: &str,
        amount: u128,
        denom: &str,
    ) -> Result<RouteResult> {
        require_non_empty(denom, "Route denom")?;
        let (source, destination) = self.route_endpoints(destination).await?;
        let value = Balance::new(denom, amount);
        let message = ChainMessage::EditRoute(MsgEditRoute {
            source: source.clone(),
            destination: destination.clone(),
            value: Some(Coin::from(&value)),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(RouteResult {
            tx,
            source,
            destination,
            name: None,
            value: Some(value),
        })
    }

    pub async fn delete_route(&self, destination: &str) -> Result<RouteResult> {
        let (source, destination) = self.route_endpoints(destination).await?;
        let message = ChainMessage::DeleteRoute(MsgDeleteRoute {
            source: source.clone(),
            destination: destination.clone(),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(RouteResult {
            tx,
            source,
            destination,
            name: None,
            value: None,
        })
    }
}
