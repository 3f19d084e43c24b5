//! Knowledge graph writes and energy investmint

use super::{require_non_empty, require_positive};
use crate::broadcast::TxResult;
use crate::client::ClientHandle;
use crate::registry::proto::{Coin, Link, MsgCyberlink, MsgInvestmint};
use crate::registry::ChainMessage;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Denom locked by investmint
pub const HYDROGEN: &str = "hydrogen";

#[derive(Debug, Clone, Serialize)]
pub struct CyberlinkResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub neuron: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CyberlinksResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub neuron: String,
    pub link_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestmintResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub neuron: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub resource: Resource,
    pub length: u64,
}

/// Energy resource minted from hydrogen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Millivolt,
    Milliampere,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Millivolt => "millivolt",
            Resource::Milliampere => "milliampere",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "millivolt" | "volt" => Ok(Resource::Millivolt),
            "milliampere" | "ampere" => Ok(Resource::Milliampere),
            other => Err(Error::InvalidArgument(format!(
                "Unknown resource '{}': expected millivolt or milliampere",
                other
            ))),
        }
    }
}

fn link(from: &str, to: &str) -> Result<Link> {
    require_non_empty(from, "Link source")?;
    require_non_empty(to, "Link destination")?;
    Ok(Link {
        from: from.to_string(),
        to: to.to_string(),
    })
}

impl ClientHandle {
    /// Link two content identifiers
    pub async fn create_cyberlink(&self, from: &str, to: &str) -> Result<CyberlinkResult> {
        let links = vec![link(from, to)?];
        let neuron = self.address().await?;
        let message = ChainMessage::Cyberlink(MsgCyberlink {
            neuron: neuron.clone(),
            links,
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(CyberlinkResult {
            tx,
            neuron,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Submit several links in one message
    pub async fn create_cyberlinks(&self, links: &[(String, String)]) -> Result<CyberlinksResult> {
        if links.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one link is required".to_string(),
            ));
        }
        let links = links
            .iter()
            .map(|(from, to)| link(from, to))
            .collect::<Result<Vec<_>>>()?;
        let link_count = links.len();

        let neuron = self.address().await?;
        let message = ChainMessage::Cyberlink(MsgCyberlink {
            neuron: neuron.clone(),
            links,
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(CyberlinksResult {
            tx,
            neuron,
            link_count,
        })
    }

    /// Lock hydrogen for `length` base periods to mint energy
    pub async fn investmint(
        &self,
        amount: u128,
        resource: Resource,
        length: u64,
    ) -> Result<InvestmintResult> {
        require_positive(amount, "Investmint amount")?;
        if length == 0 {
            return Err(Error::InvalidArgument(
                "Investmint length must be at least one period".to_string(),
            ));
        }
        let neuron = self.address().await?;
        let message = ChainMessage::Investmint(MsgInvestmint {
            neuron: neuron.clone(),
            amount: Some(Coin::new(HYDROGEN, amount)),
            resource: resource.as_str().to_string(),
            length,
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(InvestmintResult {
            tx,
            neuron,
            amount,
            resource,
            length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::harness;
    use prost::Message;

    const CID_A: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
    const CID_B: &str = "QmPZ9gcCEpqKTo6aq61g2nXGUhM4iCL3ewB6LDXZCtioEB";

    #[tokio::test]
    async fn single_link() {
        let h = harness();
        let result = h.handle.create_cyberlink(CID_A, CID_B).await.unwrap();
        assert_eq!(result.from, CID_A);

        let any = &h.chain.submissions()[0].messages[0];
        let msg = MsgCyberlink::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.neuron, result.neuron);
        assert_eq!(msg.links.len(), 1);
        assert_eq!(msg.links[0].to, CID_B);
    }

    #[tokio::test]
    async fn batch_links_share_one_message() {
        let h = harness();
        let links = vec![
            (CID_A.to_string(), CID_B.to_string()),
            (CID_B.to_string(), CID_A.to_string()),
        ];
        let result = h.handle.create_cyberlinks(&links).await.unwrap();
        assert_eq!(result.link_count, 2);
        let submitted = h.chain.submissions();
        assert_eq!(submitted[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn empty_links_are_rejected() {
        let h = harness();
        assert!(matches!(
            h.handle.create_cyberlinks(&[]).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            h.handle.create_cyberlink("", CID_B).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(h.chain.simulations().is_empty());
    }

    #[tokio::test]
    async fn investmint_locks_hydrogen() {
        let h = harness();
        let resource: Resource = "milliampere".parse().unwrap();
        h.handle.investmint(1_000_000, resource, 30).await.unwrap();

        let any = &h.chain.submissions()[0].messages[0];
        let msg = MsgInvestmint::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.amount, Some(Coin::new(HYDROGEN, 1_000_000)));
        assert_eq!(msg.resource, "milliampere");
        assert_eq!(msg.length, 30);

        assert!("watt".parse::<Resource>().is_err());
        assert!(h.handle.investmint(1, Resource::Millivolt, 0).await.is_err());
    }
}
