/*
 * Responsibility
 * - load process configuration from the environment (.env is honoured)
 * - validate values up front (missing/invalid -> startup fails)
 * - auth settings (bearer prefix, signing secret) are read once here and
 *   injected explicitly; nothing else reads them from the environment
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings consumed by the access gate.
///
/// `bearer_prefix` is matched literally (case-sensitive) at the start of the
/// `authorization` header. `token_signature` is the HMAC secret tokens are
/// verified against and is never printed.
#[derive(Clone)]
pub struct AuthConfig {
    bearer_prefix: String,
    token_signature: String,
    leeway_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_prefix", &self.bearer_prefix)
            .field("token_signature", &"<redacted>")
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(
        bearer_prefix: impl Into<String>,
        token_signature: impl Into<String>,
        leeway_seconds: u64,
    ) -> Result<Self, ConfigError> {
        let bearer_prefix = bearer_prefix.into();
        let token_signature = token_signature.into();

        // An empty prefix would accept any header value as a credential.
        if bearer_prefix.is_empty() {
            return Err(ConfigError::Invalid("BEARER_KEY"));
        }
        if token_signature.is_empty() {
            return Err(ConfigError::Invalid("TOKEN_SIGNATURE"));
        }

        Ok(Self {
            bearer_prefix,
            token_signature,
            leeway_seconds,
        })
    }

    pub fn bearer_prefix(&self) -> &str {
        &self.bearer_prefix
    }

    pub fn token_signature(&self) -> &[u8] {
        self.token_signature.as_bytes()
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,

    pub auth: AuthConfig,
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed_or("PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 10u32)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }
        let database_acquire_timeout =
            Duration::from_secs(parsed_or("DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5u64)?);

        let request_timeout = Duration::from_secs(parsed_or("REQUEST_TIMEOUT_SECONDS", 30u64)?);
        let request_body_limit_bytes = parsed_or("REQUEST_BODY_LIMIT_BYTES", 1024 * 1024usize)?;

        // Variable names follow the ones the user service has always been deployed with.
        let auth = AuthConfig::new(
            required("BEARER_KEY")?,
            required("TOKEN_SIGNATURE")?,
            parsed_or("TOKEN_LEEWAY_SECONDS", 0u64)?,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            request_timeout,
            request_body_limit_bytes,
            auth,
        })
    }
}
