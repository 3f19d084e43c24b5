//! Credential and client lifecycle
//!
//! [`ClientHandle`] is the context every write operation runs against. It
//! derives the signing identity on first need and connects each signing
//! client once; later calls reuse the cached instances. Reads go through the
//! query client and never require a credential.

use crate::broadcast::SequenceTracker;
use crate::chain::{ChainQuery, LcdClient, LcdConnector, TxBackend, TxConnector};
use crate::config::Config;
use crate::guards::{AuditLog, SlippageGuard, SpendLimit};
use crate::registry::proto::Any;
use crate::registry::{ChainMessage, Registry};
use crate::wallet::{Credentials, SigningIdentity};
use crate::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// A connected backend paired with the registry it encodes with
#[derive(Clone)]
pub struct SigningClient {
    backend: Arc<dyn TxBackend>,
    registry: Arc<Registry>,
    identity: Arc<SigningIdentity>,
}

impl SigningClient {
    pub fn address(&self) -> &str {
        self.identity.address()
    }

    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    pub fn backend(&self) -> &dyn TxBackend {
        self.backend.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode messages into the payload that is both simulated and signed
    pub fn encode(&self, messages: &[ChainMessage]) -> Result<Vec<Any>> {
        self.registry.encode_all(messages)
    }
}

impl std::fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningClient")
            .field("address", &self.identity.address())
            .field("type_urls", &self.registry.type_urls().count())
            .finish()
    }
}

/// Lazily initialized signing context plus the read-only query client
pub struct ClientHandle {
    config: Config,
    credentials: Credentials,
    registry: Arc<Registry>,
    contract_registry: Arc<Registry>,
    query: Arc<dyn ChainQuery>,
    connector: Arc<dyn TxConnector>,
    identity: OnceCell<Arc<SigningIdentity>>,
    signing: OnceCell<SigningClient>,
    exec: OnceCell<SigningClient>,
    /// Serializes fee simulation, signing and submission for the account
    pub(crate) broadcast_lock: Mutex<SequenceTracker>,
    spend_limit: SpendLimit,
    slippage_guard: SlippageGuard,
    audit: Option<AuditLog>,
}

impl ClientHandle {
    /// Handle talking to the configured LCD/RPC endpoints
    pub fn from_config(config: Config, credentials: Credentials) -> Result<Self> {
        let query = Arc::new(LcdClient::new(config.endpoints.lcd_url()?)?);
        let connector = Arc::new(LcdConnector::new(
            config.endpoints.clone(),
            config.chain.clone(),
            config.broadcast.clone(),
        ));
        Self::with_backends(config, credentials, query, connector)
    }

    /// Handle over explicit query and transaction backends
    pub fn with_backends(
        config: Config,
        credentials: Credentials,
        query: Arc<dyn ChainQuery>,
        connector: Arc<dyn TxConnector>,
    ) -> Result<Self> {
        config.validate()?;
        let spend_limit = SpendLimit::from_config(&config.limits)?;
        let slippage_guard = SlippageGuard::new(config.limits.max_slippage_percent);
        let audit = config.audit_log_path.as_deref().map(AuditLog::new);

        Ok(Self {
            config,
            credentials,
            registry: Arc::new(Registry::compose()),
            contract_registry: Arc::new(Registry::contracts()),
            query,
            connector,
            identity: OnceCell::new(),
            signing: OnceCell::new(),
            exec: OnceCell::new(),
            broadcast_lock: Mutex::new(SequenceTracker::default()),
            spend_limit,
            slippage_guard,
            audit,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn query(&self) -> &dyn ChainQuery {
        self.query.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn spend_limit(&self) -> &SpendLimit {
        &self.spend_limit
    }

    pub fn slippage_guard(&self) -> &SlippageGuard {
        &self.slippage_guard
    }

    pub(crate) fn audit(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }

    async fn identity(&self) -> Result<Arc<SigningIdentity>> {
        self.identity
            .get_or_try_init(|| async {
                let identity = self
                    .credentials
                    .derive(&self.config.chain.address_prefix)?;
                tracing::info!(address = %identity.address(), "Signing identity derived");
                Ok::<_, crate::Error>(Arc::new(identity))
            })
            .await
            .cloned()
    }

    /// Address of the signing identity, deriving it on first call
    pub async fn address(&self) -> Result<String> {
        Ok(self.identity().await?.address().to_string())
    }

    /// Client for chain-native messages (bank, staking, gov, cyber, token factory)
    pub async fn signing_client(&self) -> Result<&SigningClient> {
        self.signing
            .get_or_try_init(|| self.connect(self.registry.clone()))
            .await
    }

    /// Client for contract execution
    pub async fn exec_client(&self) -> Result<&SigningClient> {
        self.exec
            .get_or_try_init(|| self.connect(self.contract_registry.clone()))
            .await
    }

    async fn connect(&self, registry: Arc<Registry>) -> Result<SigningClient> {
        let identity = self.identity().await?;
        let backend = self.connector.connect().await?;
        Ok(SigningClient {
            backend,
            registry,
            identity,
        })
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("credentials", &self.credentials)
            .field("identity", &self.identity.get())
            .field("signing_connected", &self.signing.initialized())
            .field("exec_connected", &self.exec.initialized())
            .finish()
    }
}
