/// ENS CCIP-Read gateway server
///
/// Serves signed offchain answers (address, text, content hash) for ENS
/// subnames whose resolver raises `OffchainLookup`.
use clap::Parser;
use ens_ccip_gateway::{
    config::{CliOverrides, GatewayConfig, LogFormat},
    context::AppContext,
    error::GatewayResult,
    server,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ens-ccip-gateway")]
#[command(version)]
#[command(about = "EIP-3668 CCIP-Read gateway for ENS offchain resolution")]
struct Cli {
    /// Signing key as hex, or @path to read it from a file
    #[arg(short = 'k', long, value_name = "KEY")]
    private_key: Option<String>,

    /// Validity of each signed response, in seconds
    #[arg(short = 't', long)]
    ttl: Option<u64>,

    /// Listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Chain JSON-RPC endpoint
    #[arg(long, value_name = "URL")]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> GatewayResult<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        private_key: cli.private_key,
        ttl: cli.ttl,
        port: cli.port,
        host: cli.host,
        rpc_url: cli.rpc_url,
    };

    let config = GatewayConfig::from_env_with(overrides)?;

    init_logging(&config);
    print_banner();

    let ctx = AppContext::new(config).await?;
    info!(
        "Resolver contracts must trust signer {}",
        ctx.signer_address().to_checksum(None)
    );

    server::serve(ctx).await
}

fn init_logging(config: &GatewayConfig) {
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new(ens_ccip_gateway::config::DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn print_banner() {
    println!(
        r#"
    ================================================
      ENS CCIP-Read Gateway v{}
      EIP-3668 offchain resolution for ENS subnames
    ================================================
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
