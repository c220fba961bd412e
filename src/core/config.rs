use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

/// Durata ammessa per il token: da un'ora a un anno
const JWT_EXPIRY_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    /// Origini ammesse dal CORS, separate da virgola
    pub cors_origin: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    pub app_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24,
            server_host: "0.0.0.0".to_string(),
            server_port: 4002,
            max_connections: 5,
            cors_origin: "http://localhost:3000".to_string(),
            cookie_domain: Some("localhost".to_string()),
            cookie_secure: false,
            bcrypt_cost: 10,
            rate_limit_max: 100,
            rate_limit_window_secs: 15 * 60,
            app_env: "development".to_string(),
        }
    }
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            defaults.jwt_secret
        });

        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);

        // PORT è il nome storico della variabile, SERVER_PORT ha la precedenza
        let server_port = match env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| "Invalid PORT: must be a number between 0-65535".to_string())?,
            Err(_) => defaults.server_port,
        };

        let cookie_domain = match env::var("COOKIE_DOMAIN") {
            Ok(domain) if domain.trim().is_empty() => None,
            Ok(domain) => Some(domain),
            Err(_) => defaults.cookie_domain,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_expiry_hours: check_jwt_expiry(parse_var(
                "JWT_EXPIRY_HOURS",
                defaults.jwt_expiry_hours,
            )?)?,
            server_host,
            server_port,
            max_connections: parse_var("MAX_DB_CONNECTIONS", defaults.max_connections)?,
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            cookie_domain,
            cookie_secure: parse_var("COOKIE_SECURE", defaults.cookie_secure)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            rate_limit_max: parse_var("RATE_LIMIT_MAX", defaults.rate_limit_max)?,
            rate_limit_window_secs: parse_var(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            )?,
            app_env: env::var("APP_ENV").unwrap_or(defaults.app_env),
        })
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   CORS Origin: {}", self.cors_origin);
        info!(
            "   Rate Limit: {} requests / {}s",
            self.rate_limit_max, self.rate_limit_window_secs
        );
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera le credenziali nell'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
        url.to_string()
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {}: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn check_jwt_expiry(hours: i64) -> Result<i64, String> {
    if JWT_EXPIRY_RANGE.contains(&hours) {
        Ok(hours)
    } else {
        Err(format!(
            "Invalid JWT_EXPIRY_HOURS: {} (must be between {} and {})",
            hours,
            JWT_EXPIRY_RANGE.start(),
            JWT_EXPIRY_RANGE.end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_url_hides_credentials() {
        assert_eq!(
            Config::mask_url("mysql://root:secret@db:3306/shop"),
            "mysql://***@db:3306/shop"
        );
        assert_eq!(Config::mask_url("sqlite://catalog.db"), "sqlite://catalog.db");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.server_port, 4002);
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window_secs, 900);
        assert_eq!(config.cookie_domain.as_deref(), Some("localhost"));
        assert!(!config.cookie_secure);
    }

    #[test]
    fn jwt_expiry_must_stay_in_range() {
        assert_eq!(check_jwt_expiry(24), Ok(24));
        assert_eq!(check_jwt_expiry(1), Ok(1));
        assert_eq!(check_jwt_expiry(8760), Ok(8760));

        for hours in [0, -5, 8761, i64::MAX] {
            let err = check_jwt_expiry(hours).unwrap_err();
            assert!(err.starts_with("Invalid JWT_EXPIRY_HOURS"));
        }
    }
}
