use {
    std::{env, fs::read_to_string, path::PathBuf, time::Duration},
    tracing::warn,
    serde::Deserialize,
    thiserror::Error,
};

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct YoutubeConfig {
    api_key: Option<String>,
    endpoint: Option<String>,
    pub max_comments: usize,
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageConfig {
    static_root: Option<PathBuf>,
    pub retain_submissions: usize,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RenderingConfig {
    pub wordcloud_width: u32,
    pub wordcloud_height: u32,
    pub pie_chart_size: u32,
    pub max_words: usize,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("youtube api key is not set: provide {API_KEY_ENV} or youtube.api_key in config.toml")]
    MissingApiKey,
    #[error("invalid configuration value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 10000,
            workers: None,
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            max_comments: 300,
            request_timeout_secs: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            static_root: None,
            retain_submissions: 100,
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            wordcloud_width: 800,
            wordcloud_height: 400,
            pie_chart_size: 400,
            max_words: 200,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        read_to_string("./config.toml")
            .or_else(|_| read_to_string("/config/config.toml"))
            .map_err(|err| err.to_string())
            .and_then(|v| Self::from_toml(&v))
            .unwrap_or_else(|err| {
                warn!("failed to read config: {}", err);
                Config::default()
            })
    }

    pub fn from_toml(source: &str) -> Result<Self, String> {
        toml::from_str(source).map_err(|err| err.to_string())
    }

    /// Checked once at startup so a misconfigured service never accepts a submission.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.youtube.api_key()?;

        if self.youtube.max_comments == 0 {
            return Err(ConfigError::InvalidValue("youtube.max_comments", "must be positive".to_owned()));
        }

        if self.storage.retain_submissions == 0 {
            return Err(ConfigError::InvalidValue("storage.retain_submissions", "must be positive".to_owned()));
        }

        let rendering = &self.rendering;
        if rendering.wordcloud_width == 0 || rendering.wordcloud_height == 0 {
            return Err(ConfigError::InvalidValue(
                "rendering.wordcloud_width/wordcloud_height",
                format!("{}x{}", rendering.wordcloud_width, rendering.wordcloud_height),
            ));
        }
        if rendering.pie_chart_size < 64 {
            return Err(ConfigError::InvalidValue("rendering.pie_chart_size", "must be at least 64".to_owned()));
        }
        if rendering.max_words == 0 {
            return Err(ConfigError::InvalidValue("rendering.max_words", "must be positive".to_owned()));
        }

        Ok(())
    }
}

impl YoutubeConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Environment takes precedence over the config file. Blank values count as missing.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_api_key(env::var(API_KEY_ENV).ok(), self.api_key.as_ref())
    }

    pub fn endpoint(&self) -> String {
        self.endpoint.as_ref()
            .cloned()
            .unwrap_or("https://www.googleapis.com/youtube/v3".to_owned())
            .trim_end_matches('/')
            .to_owned()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StorageConfig {
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            static_root: Some(static_root.into()),
            ..Self::default()
        }
    }

    pub fn static_root(&self) -> PathBuf {
        self.static_root.as_ref().cloned().unwrap_or(PathBuf::from("static"))
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: Option<&String>) -> Result<String, ConfigError> {
    [from_env.as_ref(), from_file]
        .into_iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(|v| v.to_owned())
        .ok_or(ConfigError::MissingApiKey)
}
