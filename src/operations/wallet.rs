//! Bank, staking, distribution and governance operations

use super::{require_non_empty, require_positive};
use crate::broadcast::TxResult;
use crate::client::ClientHandle;
use crate::registry::proto::{
    Coin, MsgBeginRedelegate, MsgDelegate, MsgSend, MsgUndelegate, MsgVote,
    MsgWithdrawDelegatorReward,
};
use crate::registry::ChainMessage;
use crate::wallet::validate_address;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub from: String,
    pub to: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub denom: String,
}

/// Delegate or undelegate outcome
#[derive(Debug, Clone, Serialize)]
pub struct StakeResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub delegator: String,
    pub validator_address: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub denom: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedelegateResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub delegator: String,
    pub src_validator: String,
    pub dst_validator: String,
    #[serde(with = "crate::amount::as_string")]
    pub amount: u128,
    pub denom: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimRewardsResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub delegator: String,
    pub validators: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub voter: String,
    pub proposal_id: u64,
    pub option: VoteOption,
}

/// Governance vote option with its on-chain enum value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOption {
    Yes = 1,
    Abstain = 2,
    No = 3,
    NoWithVeto = 4,
}

impl VoteOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOption::Yes => "yes",
            VoteOption::Abstain => "abstain",
            VoteOption::No => "no",
            VoteOption::NoWithVeto => "no_with_veto",
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(VoteOption::Yes),
            "abstain" => Ok(VoteOption::Abstain),
            "no" => Ok(VoteOption::No),
            "no_with_veto" | "nowithveto" | "veto" => Ok(VoteOption::NoWithVeto),
            other => Err(Error::InvalidArgument(format!(
                "Unknown vote option '{}': expected yes, abstain, no or no_with_veto",
                other
            ))),
        }
    }
}

impl ClientHandle {
    /// Send tokens, refusing amounts above the configured ceiling
    pub async fn send_tokens(&self, to: &str, amount: u128, denom: &str) -> Result<SendResult> {
        self.spend_limit().check(amount, denom)?;
        require_positive(amount, "Send amount")?;
        require_non_empty(denom, "Denom")?;
        validate_address(to, &self.config().chain.address_prefix)?;

        let from = self.address().await?;
        let message = ChainMessage::Send(MsgSend {
            from_address: from.clone(),
            to_address: to.to_string(),
            amount: vec![Coin::new(denom, amount)],
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(SendResult {
            tx,
            from,
            to: to.to_string(),
            amount,
            denom: denom.to_string(),
        })
    }

    pub async fn delegate(&self, validator: &str, amount: u128, denom: &str) -> Result<StakeResult> {
        require_positive(amount, "Delegation amount")?;
        let delegator = self.address().await?;
        let message = ChainMessage::Delegate(MsgDelegate {
            delegator_address: delegator.clone(),
            validator_address: validator.to_string(),
            amount: Some(Coin::new(denom, amount)),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(StakeResult {
            tx,
            delegator,
            validator_address: validator.to_string(),
            amount,
            denom: denom.to_string(),
        })
    }

    pub async fn undelegate(
        &self,
        validator: &str,
        amount: u128,
        denom: &str,
    ) -> Result<StakeResult> {
        require_positive(amount, "Undelegation amount")?;
        let delegator = self.address().await?;
        let message = ChainMessage::Undelegate(MsgUndelegate {
            delegator_address: delegator.clone(),
            validator_address: validator.to_string(),
            amount: Some(Coin::new(denom, amount)),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(StakeResult {
            tx,
            delegator,
            validator_address: validator.to_string(),
            amount,
            denom: denom.to_string(),
        })
    }

    pub async fn redelegate(
        &self,
        src_validator: &str,
        dst_validator: &str,
        amount: u128,
        denom: &str,
    ) -> Result<RedelegateResult> {
        require_positive(amount, "Redelegation amount")?;
        if src_validator == dst_validator {
            return Err(Error::InvalidArgument(
                "Source and destination validators must differ".to_string(),
            ));
        }
        let delegator = self.address().await?;
        let message = ChainMessage::BeginRedelegate(MsgBeginRedelegate {
            delegator_address: delegator.clone(),
            validator_src_address: src_validator.to_string(),
            validator_dst_address: dst_validator.to_string(),
            amount: Some(Coin::new(denom, amount)),
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(RedelegateResult {
            tx,
            delegator,
            src_validator: src_validator.to_string(),
            dst_validator: dst_validator.to_string(),
            amount,
            denom: denom.to_string(),
        })
    }

    /// Withdraw rewards from one validator, or from every current delegation
    pub async fn claim_rewards(&self, validator: Option<&str>) -> Result<ClaimRewardsResult> {
        let delegator = self.address().await?;
        let validators: Vec<String> = match validator {
            Some(v) => vec![v.to_string()],
            None => self
                .query()
                .delegations(&delegator)
                .await?
                .into_iter()
                .map(|d| d.validator_address)
                .collect(),
        };
        if validators.is_empty() {
            return Err(Error::InvalidArgument(
                "No delegations found to claim rewards from".to_string(),
            ));
        }

        let messages: Vec<ChainMessage> = validators
            .iter()
            .map(|v| {
                ChainMessage::WithdrawDelegatorReward(MsgWithdrawDelegatorReward {
                    delegator_address: delegator.clone(),
                    validator_address: v.clone(),
                })
            })
            .collect();
        let tx = self.sign_and_broadcast(&messages, "").await?;
        Ok(ClaimRewardsResult {
            tx,
            delegator,
            validators,
        })
    }

    pub async fn vote(&self, proposal_id: u64, option: VoteOption) -> Result<VoteResult> {
        let voter = self.address().await?;
        let message = ChainMessage::Vote(MsgVote {
            proposal_id,
            voter: voter.clone(),
            option: option as i32,
        });
        let tx = self.sign_and_broadcast(&[message], "").await?;
        Ok(VoteResult {
            tx,
            voter,
            proposal_id,
            option,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Balance, Delegation};
    use crate::client::tests::{harness, harness_with};
    use crate::config::Config;
    use crate::operations::test_support::account;
    use prost::Message;

    #[tokio::test]
    async fn send_builds_msg_send() {
        let h = harness();
        let to = account(7);
        let result = h.handle.send_tokens(&to, 1_000, "boot").await.unwrap();
        assert_eq!(result.to, to);
        assert!(result.from.starts_with("bostrom1"));

        let any = &h.chain.submissions()[0].messages[0];
        let msg = MsgSend::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.from_address, result.from);
        assert_eq!(msg.amount, vec![Coin::new("boot", 1_000)]);
    }

    #[tokio::test]
    async fn send_above_ceiling_never_simulates() {
        let mut config = Config::default();
        config.limits.max_send_amount = Some("100".to_string());
        let h = harness_with(config);

        let err = h
            .handle
            .send_tokens(&account(7), 101, "boot")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::AmountExceedsLimit { amount: 101, ceiling: 100, .. }
        ));
        assert!(h.chain.simulations().is_empty());

        // Equal to the ceiling passes
        h.handle.send_tokens(&account(7), 100, "boot").await.unwrap();
    }

    #[tokio::test]
    async fn send_to_foreign_prefix_is_rejected() {
        let h = harness();
        let cosmos = crate::wallet::encode_address("cosmos", &[7; 20]).unwrap();
        let err = h.handle.send_tokens(&cosmos, 1, "boot").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn staking_messages_carry_delegator() {
        let h = harness();
        let delegated = h
            .handle
            .delegate("bostromvaloper1a", 500, "boot")
            .await
            .unwrap();
        h.handle
            .undelegate("bostromvaloper1a", 200, "boot")
            .await
            .unwrap();
        h.handle
            .redelegate("bostromvaloper1a", "bostromvaloper1b", 100, "boot")
            .await
            .unwrap();

        let submitted = h.chain.submissions();
        let delegate = MsgDelegate::decode(submitted[0].messages[0].value.as_slice()).unwrap();
        assert_eq!(delegate.delegator_address, delegated.delegator);
        assert_eq!(delegate.amount, Some(Coin::new("boot", 500)));
        let undelegate = MsgUndelegate::decode(submitted[1].messages[0].value.as_slice()).unwrap();
        assert_eq!(undelegate.amount, Some(Coin::new("boot", 200)));
        let redelegate =
            MsgBeginRedelegate::decode(submitted[2].messages[0].value.as_slice()).unwrap();
        assert_eq!(redelegate.validator_dst_address, "bostromvaloper1b");
    }

    #[tokio::test]
    async fn claim_all_batches_one_message_per_delegation() {
        let h = harness();
        let me = h.handle.address().await.unwrap();
        h.chain.set_delegations(
            &me,
            vec![
                Delegation {
                    validator_address: "bostromvaloper1a".into(),
                    balance: Balance::new("boot", 10),
                },
                Delegation {
                    validator_address: "bostromvaloper1b".into(),
                    balance: Balance::new("boot", 20),
                },
            ],
        );

        let result = h.handle.claim_rewards(None).await.unwrap();
        assert_eq!(result.validators, vec!["bostromvaloper1a", "bostromvaloper1b"]);
        let submitted = h.chain.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn claim_without_delegations_fails() {
        let h = harness();
        let err = h.handle.claim_rewards(None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(h.chain.simulations().is_empty());

        let result = h.handle.claim_rewards(Some("bostromvaloper1z")).await.unwrap();
        assert_eq!(result.validators, vec!["bostromvaloper1z"]);
    }

    #[test]
    fn vote_options_map_to_chain_values() {
        assert_eq!("yes".parse::<VoteOption>().unwrap() as i32, 1);
        assert_eq!("abstain".parse::<VoteOption>().unwrap() as i32, 2);
        assert_eq!("NO".parse::<VoteOption>().unwrap() as i32, 3);
        assert_eq!("no_with_veto".parse::<VoteOption>().unwrap() as i32, 4);
        assert!("maybe".parse::<VoteOption>().is_err());
    }

    #[tokio::test]
    async fn vote_submits_option() {
        let h = harness();
        let result = h.handle.vote(42, VoteOption::NoWithVeto).await.unwrap();
        assert_eq!(result.proposal_id, 42);
        let msg = MsgVote::decode(h.chain.submissions()[0].messages[0].value.as_slice()).unwrap();
        assert_eq!(msg.proposal_id, 42);
        assert_eq!(msg.option, 4);
    }
}
