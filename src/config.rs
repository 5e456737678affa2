use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub tables: TableSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_key: String,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    pub timeout_secs: Option<u64>,
}

fn default_jwt_audience() -> String { "authenticated".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_profiles_table")]
    pub profiles: String,
    #[serde(default = "default_saved_table")]
    pub saved_restaurants: String,
    #[serde(default = "default_user_tags_table")]
    pub user_tags: String,
    #[serde(default = "default_restaurant_tags_table")]
    pub restaurant_tags: String,
    #[serde(default = "default_feedback_table")]
    pub app_feedback: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_table(),
            saved_restaurants: default_saved_table(),
            user_tags: default_user_tags_table(),
            restaurant_tags: default_restaurant_tags_table(),
            app_feedback: default_feedback_table(),
        }
    }
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_saved_table() -> String { "saved_restaurants".to_string() }
fn default_user_tags_table() -> String { "user_tags".to_string() }
fn default_restaurant_tags_table() -> String { "restaurant_tags".to_string() }
fn default_feedback_table() -> String { "app_feedback".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Simulated latency of the mock provider
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { mock_delay_ms: default_mock_delay_ms() }
    }
}

fn default_mock_delay_ms() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingSettings {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_geocoding_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_geocoding_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoding_timeout(),
            cache_size: default_geocoding_cache_size(),
            cache_ttl_secs: default_geocoding_cache_ttl(),
        }
    }
}

fn default_geocoding_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { format!("dinefine/{}", env!("CARGO_PKG_VERSION")) }
fn default_geocoding_timeout() -> u64 { 10 }
fn default_geocoding_cache_size() -> u64 { 10_000 }
fn default_geocoding_cache_ttl() -> u64 { 86_400 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Clock skew tolerated on token expiry
    #[serde(default = "default_token_leeway")]
    pub leeway_secs: u64,
    #[serde(default = "default_profile_cache_size")]
    pub profile_cache_size: u64,
    #[serde(default = "default_profile_cache_ttl")]
    pub profile_cache_ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            leeway_secs: default_token_leeway(),
            profile_cache_size: default_profile_cache_size(),
            profile_cache_ttl_secs: default_profile_cache_ttl(),
        }
    }
}

fn default_token_leeway() -> u64 { 60 }
fn default_profile_cache_size() -> u64 { 1000 }
fn default_profile_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Plain,
}

impl LogFormat {
    /// Unknown names fall back to plain text
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Plain,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with DINEFINE__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., DINEFINE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("DINEFINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_backend_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("DINEFINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honour the conventional SUPABASE_* variables used by hosted deployments
fn apply_backend_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("SUPABASE_URL", "supabase.url"),
        ("SUPABASE_SERVICE_ROLE_KEY", "supabase.service_key"),
        ("SUPABASE_JWT_SECRET", "supabase.jwt_secret"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
