//! SIGN_MODE_DIRECT transaction assembly
//!
//! The body and auth info are serialized exactly once; the same bytes go into
//! the sign doc and the final `TxRaw`, so what is signed is what is sent.

use crate::registry::proto::{
    Any, AuthInfo, Coin, Fee, ModeInfo, ModeInfoSingle, Secp256k1PubKey, SignDoc, SignerInfo,
    TxBody, TxRaw, SECP256K1_PUBKEY_TYPE_URL, SIGN_MODE_DIRECT,
};
use prost::Message;

/// Serialized body and auth info awaiting a signature
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTx {
    pub body_bytes: Vec<u8>,
    pub auth_info_bytes: Vec<u8>,
}

impl UnsignedTx {
    pub fn new(
        messages: &[Any],
        memo: &str,
        public_key: &[u8],
        sequence: u64,
        fee_amount: Vec<Coin>,
        gas_limit: u64,
    ) -> Self {
        let body = TxBody {
            messages: messages.to_vec(),
            memo: memo.to_string(),
            timeout_height: 0,
        };

        let public_key = Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: Secp256k1PubKey {
                key: public_key.to_vec(),
            }
            .encode_to_vec(),
        };
        let auth_info = AuthInfo {
            signer_infos: vec![SignerInfo {
                public_key: Some(public_key),
                mode_info: Some(ModeInfo {
                    single: Some(ModeInfoSingle {
                        mode: SIGN_MODE_DIRECT,
                    }),
                }),
                sequence,
            }],
            fee: Some(Fee {
                amount: fee_amount,
                gas_limit,
                payer: String::new(),
                granter: String::new(),
            }),
        };

        Self {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
        }
    }

    /// Bytes the signer commits to
    pub fn sign_doc_bytes(&self, chain_id: &str, account_number: u64) -> Vec<u8> {
        SignDoc {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            chain_id: chain_id.to_string(),
            account_number,
        }
        .encode_to_vec()
    }

    /// Final transaction bytes with the given signature
    pub fn into_raw(self, signature: Vec<u8>) -> Vec<u8> {
        TxRaw {
            body_bytes: self.body_bytes,
            auth_info_bytes: self.auth_info_bytes,
            signatures: vec![signature],
        }
        .encode_to_vec()
    }

    /// Transaction bytes for simulation: same body, empty signature
    pub fn into_simulation(self) -> Vec<u8> {
        self.into_raw(Vec::new())
    }
}
