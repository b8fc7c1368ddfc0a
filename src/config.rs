use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only enable behind a reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    /// Seeded as the first ADMIN when the users table is empty.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub contact_email: String,
    pub posts_per_page: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub site: SiteConfig,
    pub security: Option<SecurityConfig>,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

/// The placeholder secret shipped in `config/default.toml`; never accepted.
pub const DEFAULT_SESSION_SECRET: &str = "change-me-quantumhive-dev-secret";

/// Upper bound for `auth.session_ttl_hours` (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: quantumhive.toml (in CWD)
        .add_source(::config::File::with_name("quantumhive").required(false));

    if let Ok(custom_path) = std::env::var("QUANTUMHIVE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("QUANTUMHIVE").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Database
    if cfg.database.url.trim().is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }
    if cfg.database.max_connections == 0 {
        return Err(anyhow::anyhow!("database.max_connections must be > 0"));
    }

    // Auth
    if cfg.auth.session_secret.len() < 16 {
        return Err(anyhow::anyhow!("auth.session_secret must be at least 16 bytes"));
    }
    if cfg.auth.session_secret == DEFAULT_SESSION_SECRET {
        return Err(anyhow::anyhow!(
            "auth.session_secret is the shipped placeholder; set QUANTUMHIVE__AUTH__SESSION_SECRET"
        ));
    }
    if cfg.auth.session_ttl_hours <= 0 || cfg.auth.session_ttl_hours > MAX_SESSION_TTL_HOURS {
        return Err(anyhow::anyhow!("auth.session_ttl_hours must be in 1..={}", MAX_SESSION_TTL_HOURS));
    }
    if cfg.auth.cookie_name.trim().is_empty() {
        return Err(anyhow::anyhow!("auth.cookie_name must not be empty"));
    }
    if !(4..=31).contains(&cfg.auth.bcrypt_cost) {
        return Err(anyhow::anyhow!("auth.bcrypt_cost must be in 4..=31"));
    }
    if cfg.auth.admin_email.is_some() != cfg.auth.admin_password.is_some() {
        return Err(anyhow::anyhow!("auth.admin_email and auth.admin_password must be set together"));
    }

    // Site
    if cfg.site.posts_per_page == 0 || cfg.site.posts_per_page > 100 {
        return Err(anyhow::anyhow!("site.posts_per_page must be in 1..=100"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        // On Windows, handle URLs like sqlite:///C:/... by stripping the leading '/'
        #[cfg(windows)]
        let path = {
            let bytes = path.as_bytes();
            if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
                &path[1..]
            } else {
                path
            }
        };
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}
