/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `JWT_SECRET`: Secret key for token signing (required, >= 32 chars)
/// - `COOKIE_DOMAIN`: Domain attribute of the refresh cookie (default: localhost)
/// - `RUST_LOG`: Log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use taskplane_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh-cookie configuration
    pub cookie: CookieConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` enables permissive mode
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Refresh-cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Domain attribute of the refresh cookie
    pub domain: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let cookie_domain = env::var("COOKIE_DOMAIN").unwrap_or_else(|_| "localhost".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            cookie: CookieConfig {
                domain: cookie_domain,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            cookie: CookieConfig {
                domain: "localhost".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }
}
