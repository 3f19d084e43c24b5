//! Message registry
//!
//! Every message this crate can sign is a [`ChainMessage`] variant. A
//! [`Registry`] maps the variant's type URL to the codec that turns it into
//! protobuf bytes (and back). Registries are composed from named
//! [`CodecSet`]s; a later set overrides an earlier one for the same type URL.

pub mod proto;

use crate::{Error, Result};
use prost::Message;
use proto::*;
use std::collections::BTreeMap;

/// Type URLs of every supported message
pub mod type_urls {
    pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
    pub const MSG_DELEGATE: &str = "/cosmos.staking.v1beta1.MsgDelegate";
    pub const MSG_UNDELEGATE: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
    pub const MSG_BEGIN_REDELEGATE: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
    pub const MSG_WITHDRAW_DELEGATOR_REWARD: &str =
        "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";
    pub const MSG_VOTE: &str = "/cosmos.gov.v1beta1.MsgVote";
    pub const MSG_TRANSFER: &str = "/ibc.applications.transfer.v1.MsgTransfer";
    pub const MSG_EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
    pub const MSG_STORE_CODE: &str = "/cosmwasm.wasm.v1.MsgStoreCode";
    pub const MSG_INSTANTIATE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
    pub const MSG_MIGRATE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgMigrateContract";
    pub const MSG_UPDATE_ADMIN: &str = "/cosmwasm.wasm.v1.MsgUpdateAdmin";
    pub const MSG_CLEAR_ADMIN: &str = "/cosmwasm.wasm.v1.MsgClearAdmin";
    pub const MSG_CYBERLINK: &str = "/cyber.graph.v1beta1.MsgCyberlink";
    pub const MSG_INVESTMINT: &str = "/cyber.resources.v1beta1.MsgInvestmint";
    pub const MSG_CREATE_POOL: &str = "/cyber.liquidity.v1beta1.MsgCreatePool";
    pub const MSG_DEPOSIT_WITHIN_BATCH: &str = "/cyber.liquidity.v1beta1.MsgDepositWithinBatch";
    pub const MSG_WITHDRAW_WITHIN_BATCH: &str = "/cyber.liquidity.v1beta1.MsgWithdrawWithinBatch";
    pub const MSG_SWAP_WITHIN_BATCH: &str = "/cyber.liquidity.v1beta1.MsgSwapWithinBatch";
    pub const MSG_CREATE_ROUTE: &str = "/cyber.grid.v1beta1.MsgCreateRoute";
    pub const MSG_EDIT_ROUTE: &str = "/cyber.grid.v1beta1.MsgEditRoute";
    pub const MSG_DELETE_ROUTE: &str = "/cyber.grid.v1beta1.MsgDeleteRoute";
    pub const MSG_CREATE_DENOM: &str = "/osmosis.tokenfactory.v1beta1.MsgCreateDenom";
    pub const MSG_MINT: &str = "/osmosis.tokenfactory.v1beta1.MsgMint";
    pub const MSG_BURN: &str = "/osmosis.tokenfactory.v1beta1.MsgBurn";
    pub const MSG_CHANGE_ADMIN: &str = "/osmosis.tokenfactory.v1beta1.MsgChangeAdmin";
}

use type_urls::*;

/// A message ready to be signed, one variant per supported type URL
#[derive(Debug, Clone, PartialEq)]
pub enum ChainMessage {
    Send(MsgSend),
    Delegate(MsgDelegate),
    Undelegate(MsgUndelegate),
    BeginRedelegate(MsgBeginRedelegate),
    WithdrawDelegatorReward(MsgWithdrawDelegatorReward),
    Vote(MsgVote),
    Transfer(MsgTransfer),
    ExecuteContract(MsgExecuteContract),
    StoreCode(MsgStoreCode),
    InstantiateContract(MsgInstantiateContract),
    MigrateContract(MsgMigrateContract),
    UpdateAdmin(MsgUpdateAdmin),
    ClearAdmin(MsgClearAdmin),
    Cyberlink(MsgCyberlink),
    Investmint(MsgInvestmint),
    CreatePool(MsgCreatePool),
    DepositWithinBatch(MsgDepositWithinBatch),
    WithdrawWithinBatch(MsgWithdrawWithinBatch),
    SwapWithinBatch(MsgSwapWithinBatch),
    CreateRoute(MsgCreateRoute),
    EditRoute(MsgEditRoute),
    DeleteRoute(MsgDeleteRoute),
    CreateDenom(MsgCreateDenom),
    Mint(MsgMint),
    Burn(MsgBurn),
    ChangeAdmin(MsgChangeAdmin),
}

impl ChainMessage {
    pub fn type_url(&self) -> &'static str {
        match self {
            ChainMessage::Send(_) => MSG_SEND,
            ChainMessage::Delegate(_) => MSG_DELEGATE,
            ChainMessage::Undelegate(_) => MSG_UNDELEGATE,
            ChainMessage::BeginRedelegate(_) => MSG_BEGIN_REDELEGATE,
            ChainMessage::WithdrawDelegatorReward(_) => MSG_WITHDRAW_DELEGATOR_REWARD,
            ChainMessage::Vote(_) => MSG_VOTE,
            ChainMessage::Transfer(_) => MSG_TRANSFER,
            ChainMessage::ExecuteContract(_) => MSG_EXECUTE_CONTRACT,
            ChainMessage::StoreCode(_) => MSG_STORE_CODE,
            ChainMessage::InstantiateContract(_) => MSG_INSTANTIATE_CONTRACT,
            ChainMessage::MigrateContract(_) => MSG_MIGRATE_CONTRACT,
            ChainMessage::UpdateAdmin(_) => MSG_UPDATE_ADMIN,
            ChainMessage::ClearAdmin(_) => MSG_CLEAR_ADMIN,
            ChainMessage::Cyberlink(_) => MSG_CYBERLINK,
            ChainMessage::Investmint(_) => MSG_INVESTMINT,
            ChainMessage::CreatePool(_) => MSG_CREATE_POOL,
            ChainMessage::DepositWithinBatch(_) => MSG_DEPOSIT_WITHIN_BATCH,
            ChainMessage::WithdrawWithinBatch(_) => MSG_WITHDRAW_WITHIN_BATCH,
            ChainMessage::SwapWithinBatch(_) => MSG_SWAP_WITHIN_BATCH,
            ChainMessage::CreateRoute(_) => MSG_CREATE_ROUTE,
            ChainMessage::EditRoute(_) => MSG_EDIT_ROUTE,
            ChainMessage::DeleteRoute(_) => MSG_DELETE_ROUTE,
            ChainMessage::CreateDenom(_) => MSG_CREATE_DENOM,
            ChainMessage::Mint(_) => MSG_MINT,
            ChainMessage::Burn(_) => MSG_BURN,
            ChainMessage::ChangeAdmin(_) => MSG_CHANGE_ADMIN,
        }
    }
}

pub type EncodeFn = fn(&ChainMessage) -> Result<Vec<u8>>;
pub type DecodeFn = fn(&[u8]) -> Result<ChainMessage>;

/// Encode/decode pair for one type URL
#[derive(Clone, Copy)]
pub struct MessageCodec {
    pub type_url: &'static str,
    pub encode: EncodeFn,
    pub decode: DecodeFn,
}

impl std::fmt::Debug for MessageCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCodec")
            .field("type_url", &self.type_url)
            .finish()
    }
}

macro_rules! codec {
    ($url:expr, $variant:ident, $ty:ty) => {
        MessageCodec {
            type_url: $url,
            encode: |msg| match msg {
                ChainMessage::$variant(inner) => Ok(inner.encode_to_vec()),
                other => Err(Error::Encode(format!(
                    "codec for {} cannot encode {}",
                    $url,
                    other.type_url()
                ))),
            },
            decode: |bytes| Ok(ChainMessage::$variant(<$ty>::decode(bytes)?)),
        }
    };
}

/// A named group of codecs contributed to a registry
#[derive(Debug, Clone)]
pub struct CodecSet {
    pub name: &'static str,
    pub codecs: Vec<MessageCodec>,
}

impl CodecSet {
    /// Messages every Cosmos SDK node understands
    pub fn cosmos() -> Self {
        Self {
            name: "cosmos",
            codecs: vec![
                codec!(MSG_SEND, Send, MsgSend),
                codec!(MSG_DELEGATE, Delegate, MsgDelegate),
                codec!(MSG_UNDELEGATE, Undelegate, MsgUndelegate),
                codec!(MSG_BEGIN_REDELEGATE, BeginRedelegate, MsgBeginRedelegate),
                codec!(
                    MSG_WITHDRAW_DELEGATOR_REWARD,
                    WithdrawDelegatorReward,
                    MsgWithdrawDelegatorReward
                ),
                codec!(MSG_VOTE, Vote, MsgVote),
                codec!(MSG_TRANSFER, Transfer, MsgTransfer),
            ],
        }
    }

    /// Knowledge graph, resources, energy grid and liquidity messages
    pub fn cyber() -> Self {
        Self {
            name: "cyber",
            codecs: vec![
                codec!(MSG_CYBERLINK, Cyberlink, MsgCyberlink),
                codec!(MSG_INVESTMINT, Investmint, MsgInvestmint),
                codec!(MSG_CREATE_POOL, CreatePool, MsgCreatePool),
                codec!(
                    MSG_DEPOSIT_WITHIN_BATCH,
                    DepositWithinBatch,
                    MsgDepositWithinBatch
                ),
                codec!(
                    MSG_WITHDRAW_WITHIN_BATCH,
                    WithdrawWithinBatch,
                    MsgWithdrawWithinBatch
                ),
                codec!(MSG_SWAP_WITHIN_BATCH, SwapWithinBatch, MsgSwapWithinBatch),
                codec!(MSG_CREATE_ROUTE, CreateRoute, MsgCreateRoute),
                codec!(MSG_EDIT_ROUTE, EditRoute, MsgEditRoute),
                codec!(MSG_DELETE_ROUTE, DeleteRoute, MsgDeleteRoute),
            ],
        }
    }

    /// Token factory extension
    pub fn osmosis() -> Self {
        Self {
            name: "osmosis",
            codecs: vec![
                codec!(MSG_CREATE_DENOM, CreateDenom, MsgCreateDenom),
                codec!(MSG_MINT, Mint, MsgMint),
                codec!(MSG_BURN, Burn, MsgBurn),
                codec!(MSG_CHANGE_ADMIN, ChangeAdmin, MsgChangeAdmin),
            ],
        }
    }

    /// CosmWasm contract execution and lifecycle
    pub fn wasm() -> Self {
        Self {
            name: "wasm",
            codecs: vec![
                codec!(MSG_EXECUTE_CONTRACT, ExecuteContract, MsgExecuteContract),
                codec!(MSG_STORE_CODE, StoreCode, MsgStoreCode),
                codec!(
                    MSG_INSTANTIATE_CONTRACT,
                    InstantiateContract,
                    MsgInstantiateContract
                ),
                codec!(MSG_MIGRATE_CONTRACT, MigrateContract, MsgMigrateContract),
                codec!(MSG_UPDATE_ADMIN, UpdateAdmin, MsgUpdateAdmin),
                codec!(MSG_CLEAR_ADMIN, ClearAdmin, MsgClearAdmin),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    codec: MessageCodec,
    origin: &'static str,
}

/// Immutable lookup from type URL to codec
#[derive(Debug, Clone)]
pub struct Registry {
    entries: BTreeMap<&'static str, Entry>,
}

impl Registry {
    /// The chain-native registry: cosmos base set plus the cyber and
    /// token factory extensions
    pub fn compose() -> Self {
        Self::from_sets(vec![CodecSet::cosmos(), CodecSet::cyber(), CodecSet::osmosis()])
    }

    /// The contract-execution registry: cosmos base set plus wasm
    pub fn contracts() -> Self {
        Self::from_sets(vec![CodecSet::cosmos(), CodecSet::wasm()])
    }

    /// Build from sets in order; later sets win on a shared type URL
    pub fn from_sets(sets: Vec<CodecSet>) -> Self {
        let mut entries: BTreeMap<&'static str, Entry> = BTreeMap::new();
        for set in sets {
            for codec in set.codecs {
                let entry = Entry {
                    codec,
                    origin: set.name,
                };
                if let Some(previous) = entries.insert(codec.type_url, entry) {
                    tracing::warn!(
                        type_url = codec.type_url,
                        replaced = previous.origin,
                        by = set.name,
                        "Message codec overridden by extension set"
                    );
                }
            }
        }
        Self { entries }
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.entries.contains_key(type_url)
    }

    /// Name of the set that supplied the codec for `type_url`
    pub fn origin(&self, type_url: &str) -> Option<&'static str> {
        self.entries.get(type_url).map(|e| e.origin)
    }

    pub fn type_urls(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn encode(&self, message: &ChainMessage) -> Result<Any> {
        let type_url = message.type_url();
        let entry = self
            .entries
            .get(type_url)
            .ok_or_else(|| Error::UnknownTypeUrl(type_url.to_string()))?;
        Ok(Any {
            type_url: type_url.to_string(),
            value: (entry.codec.encode)(message)?,
        })
    }

    pub fn encode_all(&self, messages: &[ChainMessage]) -> Result<Vec<Any>> {
        messages.iter().map(|m| self.encode(m)).collect()
    }

    pub fn decode(&self, any: &Any) -> Result<ChainMessage> {
        let entry = self
            .entries
            .get(any.type_url.as_str())
            .ok_or_else(|| Error::UnknownTypeUrl(any.type_url.clone()))?;
        (entry.codec.decode)(&any.value)
    }
}
