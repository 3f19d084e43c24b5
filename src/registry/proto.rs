//! Protobuf wire types
//!
//! Hand-maintained prost definitions for the subset of Cosmos SDK, CosmWasm,
//! IBC, cyber and osmosis messages this crate signs. Field tags follow the
//! upstream `.proto` files.

/// `google.protobuf.Any`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}

/// `cosmos.base.v1beta1.Coin`
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub amount: ::prost::alloc::string::String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction envelope (cosmos.tx.v1beta1)
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: ::prost::alloc::vec::Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: ::prost::alloc::vec::Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: ::core::option::Option<Fee>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: ::core::option::Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: ::core::option::Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModeInfo {
    #[prost(message, optional, tag = "1")]
    pub single: ::core::option::Option<ModeInfoSingle>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModeInfoSingle {
    /// `SIGN_MODE_DIRECT` = 1
    #[prost(int32, tag = "1")]
    pub mode: i32,
}

pub const SIGN_MODE_DIRECT: i32 = 1;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: ::prost::alloc::vec::Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub granter: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignDoc {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "3")]
    pub chain_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// `cosmos.crypto.secp256k1.PubKey`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Secp256k1PubKey {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
}

pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

// ---------------------------------------------------------------------------
// Bank, staking, distribution, gov
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSend {
    #[prost(string, tag = "1")]
    pub from_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to_address: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub amount: ::prost::alloc::vec::Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDelegate {
    #[prost(string, tag = "1")]
    pub delegator_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub validator_address: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub amount: ::core::option::Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgUndelegate {
    #[prost(string, tag = "1")]
    pub delegator_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub validator_address: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub amount: ::core::option::Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgBeginRedelegate {
    #[prost(string, tag = "1")]
    pub delegator_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub validator_src_address: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub validator_dst_address: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "4")]
    pub amount: ::core::option::Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgWithdrawDelegatorReward {
    #[prost(string, tag = "1")]
    pub delegator_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub validator_address: ::prost::alloc::string::String,
}

/// `cosmos.gov.v1beta1.MsgVote`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgVote {
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
    #[prost(string, tag = "2")]
    pub voter: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub option: i32,
}

// ---------------------------------------------------------------------------
// IBC transfer
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Height {
    #[prost(uint64, tag = "1")]
    pub revision_number: u64,
    #[prost(uint64, tag = "2")]
    pub revision_height: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgTransfer {
    #[prost(string, tag = "1")]
    pub source_port: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub source_channel: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub token: ::core::option::Option<Coin>,
    #[prost(string, tag = "4")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub receiver: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "6")]
    pub timeout_height: ::core::option::Option<Height>,
    #[prost(uint64, tag = "7")]
    pub timeout_timestamp: u64,
    #[prost(string, tag = "8")]
    pub memo: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// CosmWasm
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgExecuteContract {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub contract: ::prost::alloc::string::String,
    /// JSON-encoded execute message
    #[prost(bytes = "vec", tag = "3")]
    pub msg: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, repeated, tag = "5")]
    pub funds: ::prost::alloc::vec::Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgStoreCode {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub wasm_byte_code: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgInstantiateContract {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    /// Empty for a contract nobody can migrate
    #[prost(string, tag = "2")]
    pub admin: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub code_id: u64,
    #[prost(string, tag = "4")]
    pub label: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "5")]
    pub msg: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, repeated, tag = "6")]
    pub funds: ::prost::alloc::vec::Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgMigrateContract {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub contract: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub code_id: u64,
    #[prost(bytes = "vec", tag = "4")]
    pub msg: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgUpdateAdmin {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub new_admin: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub contract: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgClearAdmin {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub contract: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// cyber: graph, resources, liquidity
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Link {
    #[prost(string, tag = "1")]
    pub from: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCyberlink {
    #[prost(string, tag = "1")]
    pub neuron: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub links: ::prost::alloc::vec::Vec<Link>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgInvestmint {
    #[prost(string, tag = "1")]
    pub neuron: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub amount: ::core::option::Option<Coin>,
    #[prost(string, tag = "3")]
    pub resource: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub length: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreatePool {
    #[prost(string, tag = "1")]
    pub pool_creator_address: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub pool_type_id: u32,
    #[prost(message, repeated, tag = "4")]
    pub deposit_coins: ::prost::alloc::vec::Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDepositWithinBatch {
    #[prost(string, tag = "1")]
    pub depositor_address: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub pool_id: u64,
    #[prost(message, repeated, tag = "3")]
    pub deposit_coins: ::prost::alloc::vec::Vec<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgWithdrawWithinBatch {
    #[prost(string, tag = "1")]
    pub withdrawer_address: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub pool_id: u64,
    #[prost(message, optional, tag = "3")]
    pub pool_coin: ::core::option::Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgSwapWithinBatch {
    #[prost(string, tag = "1")]
    pub swap_requester_address: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub pool_id: u64,
    #[prost(uint32, tag = "3")]
    pub swap_type_id: u32,
    #[prost(message, optional, tag = "4")]
    pub offer_coin: ::core::option::Option<Coin>,
    #[prost(string, tag = "5")]
    pub demand_coin_denom: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "6")]
    pub offer_coin_fee: ::core::option::Option<Coin>,
    /// `sdk.Dec` in atomic form (value scaled by 10^18)
    #[prost(string, tag = "7")]
    pub order_price: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// cyber: energy grid
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateRoute {
    #[prost(string, tag = "1")]
    pub source: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub destination: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgEditRoute {
    #[prost(string, tag = "1")]
    pub source: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub destination: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub value: ::core::option::Option<Coin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgDeleteRoute {
    #[prost(string, tag = "1")]
    pub source: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub destination: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// osmosis token factory
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgCreateDenom {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub subdenom: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgMint {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub amount: ::core::option::Option<Coin>,
    #[prost(string, tag = "3")]
    pub mint_to_address: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgBurn {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub amount: ::core::option::Option<Coin>,
    #[prost(string, tag = "3")]
    pub burn_from_address: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MsgChangeAdmin {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub denom: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub new_admin: ::prost::alloc::string::String,
}
