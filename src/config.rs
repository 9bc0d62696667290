use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "HOAXIFY_DATABASE_URL")]
    pub database_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub upload: UploadConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "HOAXIFY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HOAXIFY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the management (probe) listener
    #[arg(long, env = "HOAXIFY_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "HOAXIFY_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,
}

#[derive(Clone, Debug, Args)]
pub struct UploadConfig {
    /// Root directory for uploaded files
    #[arg(long, env = "HOAXIFY_UPLOAD_PATH", default_value = "uploads")]
    pub upload_path: String,

    /// Subfolder for profile images
    #[arg(long, env = "HOAXIFY_PROFILE_IMAGES_FOLDER", default_value = "profile")]
    pub profile_images_folder: String,

    /// Subfolder for post attachments
    #[arg(long, env = "HOAXIFY_ATTACHMENTS_FOLDER", default_value = "attachments")]
    pub attachments_folder: String,
}

impl UploadConfig {
    #[must_use]
    pub fn full_profile_images_path(&self) -> PathBuf {
        Path::new(&self.upload_path).join(&self.profile_images_folder)
    }

    #[must_use]
    pub fn full_attachments_path(&self) -> PathBuf {
        Path::new(&self.upload_path).join(&self.attachments_folder)
    }
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    #[arg(long, env = "HOAXIFY_JWT_SECRET")]
    pub jwt_secret: String,

    /// Access token time-to-live in seconds
    #[arg(long, env = "HOAXIFY_ACCESS_TOKEN_TTL_SECS", default_value_t = 900)]
    pub access_token_ttl_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for standard endpoints
    #[arg(long, env = "HOAXIFY_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance for standard endpoints
    #[arg(long, env = "HOAXIFY_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,

    /// Stricter rate limit for expensive auth-related endpoints (register/login)
    #[arg(long, env = "HOAXIFY_AUTH_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub auth_per_second: u32,

    /// Burst allowance for expensive auth-related endpoints
    #[arg(long, env = "HOAXIFY_AUTH_RATE_LIMIT_BURST", default_value_t = 3)]
    pub auth_burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the readiness database probe
    #[arg(long, env = "HOAXIFY_HEALTH_DB_TIMEOUT_MS", default_value_t = 500)]
    pub db_timeout_ms: u64,

    /// Timeout for the readiness upload-directory probe
    #[arg(long, env = "HOAXIFY_HEALTH_STORAGE_TIMEOUT_MS", default_value_t = 500)]
    pub storage_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP endpoint for traces and metrics; telemetry export is disabled when unset
    #[arg(long, env = "HOAXIFY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "HOAXIFY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
