use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub spotify: SpotifySettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_accounts_base")]
    pub accounts_base: String,
    #[serde(default = "default_token_cache_path")]
    pub token_cache_path: String,
    pub timeout_secs: Option<u64>,
}

fn default_scope() -> String {
    [
        "user-read-playback-state",
        "user-modify-playback-state",
        "user-read-currently-playing",
        "user-top-read",
        "playlist-modify-public",
        "playlist-modify-private",
        "user-library-read",
    ]
    .join(" ")
}
fn default_api_base() -> String { "https://api.spotify.com/v1".to_string() }
fn default_accounts_base() -> String { "https://accounts.spotify.com".to_string() }
fn default_token_cache_path() -> String { ".cache".to_string() }

/// Sizes of the batches requested from the API
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_mood_sample_size")]
    pub mood_sample_size: u32,
    #[serde(default = "default_playlist_seed_count")]
    pub playlist_seed_count: u32,
    #[serde(default = "default_playlist_track_limit")]
    pub playlist_track_limit: u32,
    #[serde(default = "default_similar_limit")]
    pub similar_limit: u32,
    #[serde(default = "default_wrapped_track_limit")]
    pub wrapped_track_limit: u32,
    #[serde(default = "default_wrapped_artist_limit")]
    pub wrapped_artist_limit: u32,
    #[serde(default = "default_chart_track_limit")]
    pub chart_track_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            mood_sample_size: default_mood_sample_size(),
            playlist_seed_count: default_playlist_seed_count(),
            playlist_track_limit: default_playlist_track_limit(),
            similar_limit: default_similar_limit(),
            wrapped_track_limit: default_wrapped_track_limit(),
            wrapped_artist_limit: default_wrapped_artist_limit(),
            chart_track_limit: default_chart_track_limit(),
        }
    }
}

fn default_mood_sample_size() -> u32 { 20 }
fn default_playlist_seed_count() -> u32 { 5 }
fn default_playlist_track_limit() -> u32 { 25 }
fn default_similar_limit() -> u32 { 12 }
fn default_wrapped_track_limit() -> u32 { 20 }
fn default_wrapped_artist_limit() -> u32 { 10 }
fn default_chart_track_limit() -> usize { 10 }

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

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with TUNEDASH_)
    /// 4. SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, SPOTIFY_REDIRECT_URI
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local development overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // e.g., TUNEDASH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_spotify_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("TUNEDASH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional Spotify credential variables on top of the config
fn apply_spotify_env(settings: Config) -> Result<Config, ConfigError> {
    let overrides = [
        ("SPOTIFY_CLIENT_ID", "spotify.client_id"),
        ("SPOTIFY_CLIENT_SECRET", "spotify.client_secret"),
        ("SPOTIFY_REDIRECT_URI", "spotify.redirect_uri"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = std::env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
