/// Application context and dependency injection
use crate::{
    abi::CallDispatcher,
    backends::{
        DirectoryStore, JsonRpcChainReader, ProfileStore, StaticDirectory, StaticProfiles,
        SupabaseClient, SupabaseDirectory, SupabaseProfiles,
    },
    config::{DirectoryConfig, GatewayConfig},
    crypto::ResponseSigner,
    error::{GatewayError, GatewayResult},
    records::{ContractDirectorySource, RecordSource},
};
use alloy_primitives::Address;
use std::sync::Arc;
use tracing::info;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<GatewayConfig>,
    pub signer: Arc<ResponseSigner>,
    pub dispatcher: CallDispatcher,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: GatewayConfig) -> GatewayResult<Self> {
        config.validate()?;

        let signer = config.signer.load_signer().await?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("ens-ccip-gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(config.call_timeout())
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let chain = Arc::new(JsonRpcChainReader::new(
            http_client.clone(),
            config.chain.rpc_url.clone(),
        ));

        let (directory, profiles) = Self::stores(&config.directory, http_client).await?;

        let source =
            ContractDirectorySource::new(directory, chain, profiles, config.call_timeout());

        Ok(Self::with_source(config, signer, Arc::new(source)))
    }

    /// Assemble a context around an existing record source
    pub fn with_source(
        config: GatewayConfig,
        signer: ResponseSigner,
        source: Arc<dyn RecordSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            signer: Arc::new(signer),
            dispatcher: CallDispatcher::new(source),
        }
    }

    async fn stores(
        directory: &DirectoryConfig,
        http_client: reqwest::Client,
    ) -> GatewayResult<(Arc<dyn DirectoryStore>, Arc<dyn ProfileStore>)> {
        match directory {
            DirectoryConfig::Supabase { url, anon_key } => {
                info!("Directory backend: Supabase at {}", url);
                let client = SupabaseClient::new(http_client, url, anon_key);
                Ok((
                    Arc::new(SupabaseDirectory::new(client.clone())),
                    Arc::new(SupabaseProfiles::new(client)),
                ))
            }
            DirectoryConfig::Static {
                directory_file,
                profiles_file,
            } => {
                let directory = StaticDirectory::load(directory_file).await?;
                let profiles = match profiles_file {
                    Some(path) => StaticProfiles::load(path).await?,
                    None => StaticProfiles::new(),
                };
                info!(
                    "Directory backend: static files ({} roots, {} profiles)",
                    directory.root_count(),
                    profiles.wallet_count()
                );
                Ok((Arc::new(directory), Arc::new(profiles)))
            }
        }
    }

    /// Address that signs every response
    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }
}
