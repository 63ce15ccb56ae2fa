/// Configuration management for the CCIP-Read gateway
///
/// Values come from the environment (after `.env` is loaded) and can be
/// overridden from the command line via [`CliOverrides`].
use crate::{
    crypto::ResponseSigner,
    error::{GatewayError, GatewayResult},
};
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

/// Chainweb EVM testnet, chain 20
pub const DEFAULT_RPC_URL: &str =
    "https://evm-testnet.chainweb.com/chainweb/0.0/evm-testnet/chain/20/evm/rpc";

pub const DEFAULT_LOG_FILTER: &str = "ens_ccip_gateway=info,tower_http=info";

/// Main gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    pub signer: SignerConfig,
    pub chain: ChainConfig,
    pub directory: DirectoryConfig,
    pub logging: LoggingConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Validity window of each signed response, in seconds
    pub signature_ttl_secs: u64,
    /// Deadline for a whole request, from receipt to signed response
    pub request_timeout_secs: u64,
}

/// Signing key configuration
#[derive(Clone)]
pub struct SignerConfig {
    /// Hex private key, or `@path` to read it from a file
    pub private_key: String,
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.private_key.starts_with('@') {
            self.private_key.as_str()
        } else {
            "<redacted>"
        };
        f.debug_struct("SignerConfig")
            .field("private_key", &shown)
            .finish()
    }
}

/// Chain RPC configuration
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Per-call deadline for chain and store lookups
    pub call_timeout_secs: u64,
}

/// Where root identifiers and profiles are looked up
#[derive(Clone)]
pub enum DirectoryConfig {
    Supabase {
        url: String,
        anon_key: String,
    },
    Static {
        directory_file: PathBuf,
        profiles_file: Option<PathBuf>,
    },
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryConfig::Supabase { url, .. } => f
                .debug_struct("Supabase")
                .field("url", url)
                .field("anon_key", &"<redacted>")
                .finish(),
            DirectoryConfig::Static {
                directory_file,
                profiles_file,
            } => f
                .debug_struct("Static")
                .field("directory_file", directory_file)
                .field("profiles_file", profiles_file)
                .finish(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(GatewayError::Config(format!(
                "Unknown log format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string
    pub level: String,
    pub format: LogFormat,
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub private_key: Option<String>,
    pub ttl: Option<u64>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub rpc_url: Option<String>,
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> GatewayResult<T> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::Config(format!("Invalid value for {}: '{}'", name, raw))),
        None => Ok(default),
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables, then apply overrides
    pub fn from_env_with(overrides: CliOverrides) -> GatewayResult<Self> {
        dotenv::dotenv().ok();
        Self::from_source(|name| env::var(name).ok(), overrides)
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_source(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: CliOverrides,
    ) -> GatewayResult<Self> {
        let private_key = overrides
            .private_key
            .or_else(|| lookup("GATEWAY_PRIVATE_KEY"))
            .ok_or_else(|| {
                GatewayError::Config(
                    "Signing key required (GATEWAY_PRIVATE_KEY or --private-key)".to_string(),
                )
            })?;

        let signature_ttl_secs = match overrides.ttl {
            Some(ttl) => ttl,
            None => parse_var(&lookup, "GATEWAY_TTL", 300)?,
        };
        let port = match overrides.port {
            Some(port) => port,
            None => parse_var(&lookup, "PORT", 8080)?,
        };
        let host = overrides
            .host
            .or_else(|| lookup("GATEWAY_HOST"))
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let request_timeout_secs = parse_var(&lookup, "GATEWAY_REQUEST_TIMEOUT_SECS", 30)?;

        let rpc_url = overrides
            .rpc_url
            .or_else(|| lookup("GATEWAY_RPC_URL"))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let call_timeout_secs = parse_var(&lookup, "GATEWAY_CALL_TIMEOUT_SECS", 10)?;

        let directory = match (lookup("SUPABASE_URL"), lookup("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => DirectoryConfig::Supabase { url, anon_key },
            (Some(_), None) => {
                return Err(GatewayError::Config(
                    "SUPABASE_URL is set but SUPABASE_ANON_KEY is missing".to_string(),
                ))
            }
            (None, _) => match lookup("GATEWAY_DIRECTORY_FILE") {
                Some(path) => DirectoryConfig::Static {
                    directory_file: PathBuf::from(path),
                    profiles_file: lookup("GATEWAY_PROFILES_FILE").map(PathBuf::from),
                },
                None => {
                    return Err(GatewayError::Config(
                        "No directory backend configured (set SUPABASE_URL and \
                         SUPABASE_ANON_KEY, or GATEWAY_DIRECTORY_FILE)"
                            .to_string(),
                    ))
                }
            },
        };

        let level = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let format = match lookup("GATEWAY_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Text,
        };

        Ok(GatewayConfig {
            service: ServiceConfig {
                host,
                port,
                signature_ttl_secs,
                request_timeout_secs,
            },
            signer: SignerConfig { private_key },
            chain: ChainConfig {
                rpc_url,
                call_timeout_secs,
            },
            directory,
            logging: LoggingConfig { level, format },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> GatewayResult<()> {
        if self.service.signature_ttl_secs == 0 {
            return Err(GatewayError::Config(
                "Signature TTL must be at least 1 second".to_string(),
            ));
        }

        if self.service.request_timeout_secs == 0 || self.chain.call_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "Timeouts must be at least 1 second".to_string(),
            ));
        }

        if self.chain.rpc_url.trim().is_empty() {
            return Err(GatewayError::Config("RPC URL cannot be empty".to_string()));
        }

        if self.signer.private_key.trim().is_empty() {
            return Err(GatewayError::Config("Signing key cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.chain.call_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

impl SignerConfig {
    /// Build the response signer, reading the key file first for `@path`
    pub async fn load_signer(&self) -> GatewayResult<ResponseSigner> {
        let key = match self.private_key.strip_prefix('@') {
            Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                GatewayError::Config(format!("Failed to read key file {}: {}", path, e))
            })?,
            None => self.private_key.clone(),
        };

        ResponseSigner::from_hex(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("GATEWAY_PRIVATE_KEY", DEV_KEY),
            ("GATEWAY_DIRECTORY_FILE", "directory.json"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_source(vars(&minimal()), CliOverrides::default()).unwrap();

        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.host, "0.0.0.0");
        assert_eq!(config.service.signature_ttl_secs, 300);
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.chain.call_timeout_secs, 10);
        assert_eq!(config.chain.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.logging.level, DEFAULT_LOG_FILTER);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(matches!(
            config.directory,
            DirectoryConfig::Static { profiles_file: None, .. }
        ));
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut env = minimal();
        env.push(("PORT", "9000"));
        env.push(("GATEWAY_TTL", "60"));

        let overrides = CliOverrides {
            port: Some(9100),
            ttl: Some(120),
            host: Some("127.0.0.1".to_string()),
            ..Default::default()
        };
        let config = GatewayConfig::from_source(vars(&env), overrides).unwrap();

        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.signature_ttl_secs, 120);
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
    }

    #[test]
    fn test_private_key_required() {
        let env = vec![("GATEWAY_DIRECTORY_FILE", "directory.json")];
        let result = GatewayConfig::from_source(vars(&env), CliOverrides::default());
        assert!(matches!(result, Err(GatewayError::Config(_))));

        let overrides = CliOverrides {
            private_key: Some(DEV_KEY.to_string()),
            ..Default::default()
        };
        assert!(GatewayConfig::from_source(vars(&env), overrides).is_ok());
    }

    #[test]
    fn test_directory_backend_required() {
        let env = vec![("GATEWAY_PRIVATE_KEY", DEV_KEY)];
        assert!(GatewayConfig::from_source(vars(&env), CliOverrides::default()).is_err());

        let mut env = minimal();
        env.push(("SUPABASE_URL", "https://abc.supabase.co"));
        assert!(GatewayConfig::from_source(vars(&env), CliOverrides::default()).is_err());

        env.push(("SUPABASE_ANON_KEY", "anon"));
        let config = GatewayConfig::from_source(vars(&env), CliOverrides::default()).unwrap();
        assert!(matches!(config.directory, DirectoryConfig::Supabase { .. }));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut env = minimal();
        env.push(("GATEWAY_TTL", "five minutes"));
        assert!(GatewayConfig::from_source(vars(&env), CliOverrides::default()).is_err());

        let mut env = minimal();
        env.push(("PORT", "70000"));
        assert!(GatewayConfig::from_source(vars(&env), CliOverrides::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl_and_timeouts() {
        let mut config =
            GatewayConfig::from_source(vars(&minimal()), CliOverrides::default()).unwrap();
        config.service.signature_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config =
            GatewayConfig::from_source(vars(&minimal()), CliOverrides::default()).unwrap();
        config.chain.call_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config =
            GatewayConfig::from_source(vars(&minimal()), CliOverrides::default()).unwrap();
        config.chain.rpc_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut env = minimal();
        env.push(("SUPABASE_URL", "https://abc.supabase.co"));
        env.push(("SUPABASE_ANON_KEY", "super-secret-anon"));
        let config = GatewayConfig::from_source(vars(&env), CliOverrides::default()).unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("ac0974bec39a17e3"));
        assert!(!debug.contains("super-secret-anon"));
        assert!(debug.contains("abc.supabase.co"));
    }

    #[tokio::test]
    async fn test_load_signer_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", DEV_KEY).unwrap();

        let signer_config = SignerConfig {
            private_key: format!("@{}", file.path().display()),
        };
        let signer = signer_config.load_signer().await.unwrap();
        assert_eq!(
            signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[tokio::test]
    async fn test_load_signer_rejects_missing_file_and_bad_key() {
        let missing = SignerConfig {
            private_key: "@/nonexistent/gateway.key".to_string(),
        };
        assert!(matches!(missing.load_signer().await, Err(GatewayError::Config(_))));

        let short = SignerConfig {
            private_key: "0x1234".to_string(),
        };
        assert!(short.load_signer().await.is_err());
    }
}
