use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_lifetime_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// API key for the transactional mail provider. Empty disables sending;
    /// outbound mail is logged instead.
    pub api_key: String,
    pub endpoint: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    /// Comma-separated allowed CORS origins; empty means allow any.
    pub cors_origins: Vec<String>,
    /// When true, a re-submission to a test in a "Single Time" category is
    /// rejected. The field existed in the legacy platform but was never
    /// enforced, so this defaults to false.
    pub enforce_single_attempt: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10), // Default value
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1), // Default value
        };

        // Auth configuration
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let token_lifetime_secs = match env::var("TOKEN_LIFETIME_SECS") {
            Ok(val) => val.parse().context("Failed to parse TOKEN_LIFETIME_SECS")?,
            Err(_) => 3600,
        };

        // Mail configuration (optional; disabled when no API key is set)
        let mail_api_key = env::var("MAIL_API_KEY").unwrap_or_default();
        let mail_endpoint = env::var("MAIL_ENDPOINT")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());
        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string());

        // App configuration
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "LMS Backend".to_string());
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let enforce_single_attempt = env::var("ENFORCE_SINGLE_ATTEMPT")
            .map(|v| v.parse().unwrap_or(false))
            .unwrap_or(false);

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                token_lifetime_secs,
            },
            mail: MailConfig {
                api_key: mail_api_key,
                endpoint: mail_endpoint,
                from: mail_from,
            },
            app: AppConfig {
                name: app_name,
                cors_origins,
                enforce_single_attempt,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}

#[cfg(test)]
pub fn init_for_tests() -> &'static Config {
    CONFIG.get_or_init(|| Config {
        server: ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/lms_test".to_string(),
            max_connections: Some(1),
            min_connections: Some(1),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_lifetime_secs: 3600,
        },
        mail: MailConfig {
            api_key: String::new(),
            endpoint: "https://api.resend.com/emails".to_string(),
            from: "no-reply@localhost".to_string(),
        },
        app: AppConfig {
            name: "LMS Backend".to_string(),
            cors_origins: Vec::new(),
            enforce_single_attempt: false,
        },
    })
}
