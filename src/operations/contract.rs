//! CosmWasm contracts through the contract client: upload, instantiate,
//! execute, migrate and admin changes

use super::require_non_empty;
use crate::broadcast::TxResult;
use crate::chain::Balance;
use crate::client::ClientHandle;
use crate::registry::proto::{
    Coin, MsgClearAdmin, MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract,
    MsgStoreCode, MsgUpdateAdmin,
};
use crate::registry::ChainMessage;
use crate::wallet::validate_address;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Leading bytes of every wasm module
const WASM_MAGIC: &[u8] = b"\0asm";

pub const CLEARED_ADMIN_NOTE: &str = "Admin cleared; the contract can no longer be migrated";

/// One `execute` call against a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract: String,
    pub msg: serde_json::Value,
    #[serde(default)]
    pub funds: Vec<Balance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub contract: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteMultiResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub contracts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    /// Read from the `store_code` event; `None` if the node omitted it
    pub code_id: Option<u64>,
    pub checksum: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstantiateResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub code_id: u64,
    pub label: String,
    pub admin: Option<String>,
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrateResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub contract: String,
    pub new_code_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractAdminResult {
    #[serde(flatten)]
    pub tx: TxResult,
    pub sender: String,
    pub contract: String,
    /// `None` once the admin has been cleared
    pub new_admin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

fn json_object(msg: &serde_json::Value, what: &str) -> Result<Vec<u8>> {
    if !msg.is_object() {
        return Err(Error::InvalidArgument(format!(
            "{} must be a JSON object",
            what
        )));
    }
    Ok(serde_json::to_vec(msg)?)
}

/// Coins must be sorted by denom to pass chain validation
fn sorted_funds(funds: &[Balance]) -> Vec<Coin> {
    let mut coins: Vec<Coin> = funds.iter().map(Coin::from).collect();
    coins.sort_by(|a, b| a.denom.cmp(&b.denom));
    coins
}

impl ContractCall {
    pub fn new(contract: impl Into<String>, msg: serde_json::Value) -> Self {
        Self {
            contract: contract.into(),
            msg,
            funds: Vec::new(),
        }
    }

    pub fn with_funds(mut self, funds: Vec<Balance>) -> Self {
        self.funds = funds;
        self
    }

    fn to_message(&self, sender: &str, prefix: &str) -> Result<ChainMessage> {
        require_non_empty(&self.contract, "Contract address")?;
        validate_address(&self.contract, prefix)?;
        let msg = json_object(
            &self.msg,
            &format!("Contract message for {}", self.contract),
        )?;
        Ok(ChainMessage::ExecuteContract(MsgExecuteContract {
            sender: sender.to_string(),
            contract: self.contract.clone(),
            msg,
            funds: sorted_funds(&self.funds),
        }))
    }
}

impl ClientHandle {
    /// Execute one contract message
    pub async fn execute_contract(
        &self,
        contract: &str,
        msg: serde_json::Value,
        funds: Vec<Balance>,
        memo: &str,
    ) -> Result<ExecuteResult> {
        let call = ContractCall::new(contract, msg).with_funds(funds);
        let sender = self.address().await?;
        let message = call.to_message(&sender, &self.config().chain.address_prefix)?;
        let tx = self.execute(&[message], memo).await?;
        Ok(ExecuteResult {
            tx,
            sender,
            contract: call.contract,
        })
    }

    /// Execute several contract messages atomically in one transaction
    pub async fn execute_contract_multi(
        &self,
        calls: &[ContractCall],
        memo: &str,
    ) -> Result<ExecuteMultiResult> {
        if calls.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one contract call is required".to_string(),
            ));
        }
        let sender = self.address().await?;
        let prefix = &self.config().chain.address_prefix;
        let messages = calls
            .iter()
            .map(|call| call.to_message(&sender, prefix))
            .collect::<Result<Vec<_>>>()?;
        let tx = self.execute(&messages, memo).await?;
        Ok(ExecuteMultiResult {
            tx,
            sender,
            contracts: calls.iter().map(|c| c.contract.clone()).collect(),
        })
    }

    /// Store wasm bytecode on chain
    pub async fn upload_code(&self, wasm_byte_code: Vec<u8>, memo: &str) -> Result<UploadResult> {
        if !wasm_byte_code.starts_with(WASM_MAGIC) {
            return Err(Error::InvalidArgument(
                "Bytecode is not a wasm module".to_string(),
            ));
        }
        let size = wasm_byte_code.len();
        let sender = self.address().await?;
        let message = ChainMessage::StoreCode(MsgStoreCode {
            sender: sender.clone(),
            wasm_byte_code,
        });
        let tx = self.execute(&[message], memo).await?;
        let code_id = tx
            .event_attribute("store_code", "code_id")
            .and_then(|id| id.parse().ok());
        if code_id.is_none() {
            tracing::warn!(tx_hash = %tx.tx_hash, "Upload succeeded but no code id was reported");
        }
        let checksum = tx
            .event_attribute("store_code", "code_checksum")
            .map(str::to_string);
        Ok(UploadResult {
            tx,
            sender,
            code_id,
            checksum,
            size,
        })
    }

    pub async fn upload_code_from_file(&self, path: &Path, memo: &str) -> Result<UploadResult> {
        let bytes = tokio::fs::read(path).await?;
        self.upload_code(bytes, memo).await
    }

    /// Create a contract from stored code; `admin` may later migrate it
    pub async fn instantiate_contract(
        &self,
        code_id: u64,
        msg: serde_json::Value,
        label: &str,
        funds: Vec<Balance>,
        admin: Option<&str>,
        memo: &str,
    ) -> Result<InstantiateResult> {
        require_non_empty(label, "Contract label")?;
        let prefix = &self.config().chain.address_prefix;
        if let Some(admin) = admin {
            validate_address(admin, prefix)?;
        }
        let init_msg = json_object(&msg, "Instantiate message")?;
        let sender = self.address().await?;
        let message = ChainMessage::InstantiateContract(MsgInstantiateContract {
            sender: sender.clone(),
            admin: admin.unwrap_or_default().to_string(),
            code_id,
            label: label.to_string(),
            msg: init_msg,
            funds: sorted_funds(&funds),
        });
        let tx = self.execute(&[message], memo).await?;
        let contract_address = tx
            .event_attribute("instantiate", "_contract_address")
            .map(str::to_string);
        if contract_address.is_none() {
            tracing::warn!(tx_hash = %tx.tx_hash, code_id, "Instantiated but no contract address was reported");
        }
        Ok(InstantiateResult {
            tx,
            sender,
            code_id,
            label: label.to_string(),
            admin: admin.map(str::to_string),
            contract_address,
        })
    }

    /// Move a contract to new code; only its admin may do this
    pub async fn migrate_contract(
        &self,
        contract: &str,
        new_code_id: u64,
        msg: serde_json::Value,
        memo: &str,
    ) -> Result<MigrateResult> {
        validate_address(contract, &self.config().chain.address_prefix)?;
        let migrate_msg = json_object(&msg, "Migrate message")?;
        let sender = self.address().await?;
        let message = ChainMessage::MigrateContract(MsgMigrateContract {
            sender: sender.clone(),
            contract: contract.to_string(),
            code_id: new_code_id,
            msg: migrate_msg,
        });
        let tx = self.execute(&[message], memo).await?;
        Ok(MigrateResult {
            tx,
            sender,
            contract: contract.to_string(),
            new_code_id,
        })
    }

    pub async fn update_contract_admin(
        &self,
        contract: &str,
        new_admin: &str,
        memo: &str,
    ) -> Result<ContractAdminResult> {
        let prefix = &self.config().chain.address_prefix;
        validate_address(contract, prefix)?;
        validate_address(new_admin, prefix)?;
        let sender = self.address().await?;
        let message = ChainMessage::UpdateAdmin(MsgUpdateAdmin {
            sender: sender.clone(),
            new_admin: new_admin.to_string(),
            contract: contract.to_string(),
        });
        let tx = self.execute(&[message], memo).await?;
        Ok(ContractAdminResult {
            tx,
            sender,
            contract: contract.to_string(),
            new_admin: Some(new_admin.to_string()),
            note: None,
        })
    }

    /// Remove the admin, making the contract immutable
    pub async fn clear_contract_admin(
        &self,
        contract: &str,
        memo: &str,
    ) -> Result<ContractAdminResult> {
        validate_address(contract, &self.config().chain.address_prefix)?;
        let sender = self.address().await?;
        let message = ChainMessage::ClearAdmin(MsgClearAdmin {
            sender: sender.clone(),
            contract: contract.to_string(),
        });
        let tx = self.execute(&[message], memo).await?;
        Ok(ContractAdminResult {
            tx,
            sender,
            contract: contract.to_string(),
            new_admin: None,
            note: Some(CLEARED_ADMIN_NOTE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::TxEvent;
    use crate::client::tests::harness;
    use crate::operations::test_support::account;
    use crate::registry::type_urls::{
        MSG_CLEAR_ADMIN, MSG_EXECUTE_CONTRACT, MSG_INSTANTIATE_CONTRACT, MSG_MIGRATE_CONTRACT,
        MSG_STORE_CODE, MSG_UPDATE_ADMIN,
    };
    use crate::wallet::encode_address;
    use prost::Message;
    use serde_json::json;

    fn contract(seed: u8) -> String {
        encode_address("bostrom", &[seed; 32]).unwrap()
    }

    #[tokio::test]
    async fn execute_encodes_json_and_sorted_funds() {
        let h = harness();
        let target = contract(1);
        let result = h
            .handle
            .execute_contract(
                &target,
                json!({ "claim": {} }),
                vec![Balance::new("hydrogen", 5), Balance::new("boot", 7)],
                "mine",
            )
            .await
            .unwrap();
        assert_eq!(result.contract, target);

        let submitted = h.chain.submissions();
        assert_eq!(submitted[0].memo, "mine");
        let any = &submitted[0].messages[0];
        assert_eq!(any.type_url, MSG_EXECUTE_CONTRACT);
        let msg = MsgExecuteContract::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.sender, result.sender);
        let body: serde_json::Value = serde_json::from_slice(&msg.msg).unwrap();
        assert_eq!(body, json!({ "claim": {} }));
        assert_eq!(
            msg.funds,
            vec![Coin::new("boot", 7), Coin::new("hydrogen", 5)]
        );
    }

    #[tokio::test]
    async fn multi_execute_is_one_transaction() {
        let h = harness();
        let calls = vec![
            ContractCall::new(contract(1), json!({ "a": {} })),
            ContractCall::new(contract(2), json!({ "b": { "n": 1 } })),
        ];
        let result = h.handle.execute_contract_multi(&calls, "").await.unwrap();
        assert_eq!(result.contracts.len(), 2);

        let submitted = h.chain.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].messages.len(), 2);
        // The contract client is connected separately from the chain-native one
        assert_eq!(h.connector.connects(), 1);
        h.handle.exec_client().await.unwrap();
        assert_eq!(h.connector.connects(), 1);
    }

    #[tokio::test]
    async fn invalid_calls_never_reach_the_chain() {
        let h = harness();
        assert!(matches!(
            h.handle.execute_contract_multi(&[], "").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            h.handle
                .execute_contract(&contract(1), json!("claim"), vec![], "")
                .await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            h.handle
                .execute_contract("not-an-address", json!({}), vec![], "")
                .await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(h.chain.simulations().is_empty());
    }

    #[tokio::test]
    async fn upload_reports_code_id_from_events() {
        let h = harness();
        h.chain.emit_events(vec![TxEvent::new(
            "store_code",
            &[("code_checksum", "abc123"), ("code_id", "42")],
        )]);
        let wasm = b"\0asm\x01\0\0\0rest".to_vec();
        let result = h.handle.upload_code(wasm.clone(), "").await.unwrap();
        assert_eq!(result.code_id, Some(42));
        assert_eq!(result.checksum.as_deref(), Some("abc123"));
        assert_eq!(result.size, wasm.len());

        let any = &h.chain.submissions()[0].messages[0];
        assert_eq!(any.type_url, MSG_STORE_CODE);
        let msg = MsgStoreCode::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.wasm_byte_code, wasm);

        assert!(matches!(
            h.handle.upload_code(b"not wasm".to_vec(), "").await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn upload_from_file_reads_bytes() {
        let h = harness();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"\0asm\x01\0\0\0").unwrap();
        let result = h.handle.upload_code_from_file(file.path(), "").await.unwrap();
        assert_eq!(result.size, 8);
        assert_eq!(result.code_id, None);

        let missing = h
            .handle
            .upload_code_from_file(Path::new("/nonexistent/contract.wasm"), "")
            .await;
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn instantiate_reads_contract_address() {
        let h = harness();
        let created = contract(7);
        h.chain.emit_events(vec![TxEvent::new(
            "instantiate",
            &[("_contract_address", created.as_str()), ("code_id", "12")],
        )]);
        let admin = account(4);
        let result = h
            .handle
            .instantiate_contract(
                12,
                json!({ "count": 0 }),
                "counter",
                vec![Balance::new("boot", 3)],
                Some(&admin),
                "",
            )
            .await
            .unwrap();
        assert_eq!(result.contract_address.as_deref(), Some(created.as_str()));

        let any = &h.chain.submissions()[0].messages[0];
        assert_eq!(any.type_url, MSG_INSTANTIATE_CONTRACT);
        let msg = MsgInstantiateContract::decode(any.value.as_slice()).unwrap();
        assert_eq!(msg.code_id, 12);
        assert_eq!(msg.label, "counter");
        assert_eq!(msg.admin, admin);
        assert_eq!(msg.funds, vec![Coin::new("boot", 3)]);
    }

    #[tokio::test]
    async fn instantiate_without_admin_leaves_it_empty() {
        let h = harness();
        let result = h
            .handle
            .instantiate_contract(3, json!({}), "frozen", vec![], None, "")
            .await
            .unwrap();
        assert_eq!(result.admin, None);
        assert_eq!(result.contract_address, None);
        let any = &h.chain.submissions()[0].messages[0];
        let msg = MsgInstantiateContract::decode(any.value.as_slice()).unwrap();
        assert!(msg.admin.is_empty());

        assert!(h
            .handle
            .instantiate_contract(3, json!({}), "", vec![], None, "")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn migrate_and_admin_changes() {
        let h = harness();
        let target = contract(1);
        let new_admin = account(5);

        h.handle
            .migrate_contract(&target, 20, json!({ "migrate": {} }), "")
            .await
            .unwrap();
        h.handle
            .update_contract_admin(&target, &new_admin, "")
            .await
            .unwrap();
        let cleared = h.handle.clear_contract_admin(&target, "").await.unwrap();
        assert_eq!(cleared.new_admin, None);
        assert_eq!(cleared.note, Some(CLEARED_ADMIN_NOTE));

        let submitted = h.chain.submissions();
        let urls: Vec<&str> = submitted
            .iter()
            .map(|s| s.messages[0].type_url.as_str())
            .collect();
        assert_eq!(urls, vec![MSG_MIGRATE_CONTRACT, MSG_UPDATE_ADMIN, MSG_CLEAR_ADMIN]);

        let migrate = MsgMigrateContract::decode(submitted[0].messages[0].value.as_slice()).unwrap();
        assert_eq!(migrate.code_id, 20);
        assert_eq!(migrate.contract, target);
        let update = MsgUpdateAdmin::decode(submitted[1].messages[0].value.as_slice()).unwrap();
        assert_eq!(update.new_admin, new_admin);
        let clear = MsgClearAdmin::decode(submitted[2].messages[0].value.as_slice()).unwrap();
        assert_eq!(clear.contract, target);
    }

    #[tokio::test]
    async fn lifecycle_messages_use_the_contract_registry() {
        let h = harness();
        let clear = ChainMessage::ClearAdmin(MsgClearAdmin {
            sender: "bostrom1s".into(),
            contract: contract(1),
        });
        assert!(matches!(
            h.handle.sign_and_broadcast(&[clear], "").await,
            Err(Error::UnknownTypeUrl(_))
        ));
    }
}
