//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    fs,
    num::NonZeroU32,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::types::CommentSort;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quire";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_COMMENT_PAGE_SIZE: u32 = 10;
const DEFAULT_REPLY_PAGE_SIZE: u32 = 5;
const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

/// Global flags shared by every command of the client binary.
#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "QUIRE_CONFIG_FILE", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// API base URL, e.g. <https://blog.example.com>
    #[arg(long, env = "QUIRE_SITE_URL", global = true)]
    pub site: Option<String>,

    /// Path to a file containing a bearer token (takes precedence over env)
    #[arg(long, env = "QUIRE_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Bearer token from env; the flag stays hidden so tokens are not typed into shell history
    #[arg(long = "token-env", hide = true, env = "QUIRE_TOKEN")]
    pub token_env: Option<String>,

    /// Override the request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
    pub comments: CommentSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub category_limit: usize,
    pub tag_limit: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CommentSettings {
    pub page_size: NonZeroU32,
    pub reply_page_size: NonZeroU32,
    pub sort: CommentSort,
}

impl Default for CommentSettings {
    fn default() -> Self {
        Self {
            page_size: NonZeroU32::new(DEFAULT_COMMENT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            reply_page_size: NonZeroU32::new(DEFAULT_REPLY_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            sort: CommentSort::Latest,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub page_size: NonZeroU32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to read token file {path}: {source}")]
    TokenFile {
        path: String,
        source: std::io::Error,
    },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &GlobalOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("QUIRE").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides)?;

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
    comments: RawCommentSettings,
    search: RawSearchSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) -> Result<(), LoadError> {
        if let Some(site) = overrides.site.as_ref() {
            self.api.base_url = Some(site.clone());
        }
        if let Some(path) = overrides.token_file.as_ref() {
            let token = fs::read_to_string(path).map_err(|source| LoadError::TokenFile {
                path: path.display().to_string(),
                source,
            })?;
            self.api.token = Some(token.trim().to_string());
        } else if let Some(token) = overrides.token_env.as_ref() {
            self.api.token = Some(token.clone());
        }
        if let Some(seconds) = overrides.timeout_seconds {
            self.api.timeout_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        Ok(())
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            logging,
            cache,
            comments,
            search,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            logging: build_logging_settings(logging)?,
            cache: build_cache_settings(cache),
            comments: build_comment_settings(comments)?,
            search: build_search_settings(search)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            LoadError::invalid("api.base_url", "site URL is required (use --site or QUIRE_SITE_URL)")
        })?;
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            "scheme must be http or https",
        ));
    }

    let token = api.token.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let timeout_secs = api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "api.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ApiSettings {
        base_url,
        token,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> CacheSettings {
    CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        category_limit: cache.category_limit.unwrap_or(0),
        tag_limit: cache.tag_limit.unwrap_or(0),
    }
}

fn build_comment_settings(comments: RawCommentSettings) -> Result<CommentSettings, LoadError> {
    let page_size = non_zero_u32(
        comments
            .page_size
            .unwrap_or(DEFAULT_COMMENT_PAGE_SIZE.into()),
        "comments.page_size",
    )?;
    let reply_page_size = non_zero_u32(
        comments
            .reply_page_size
            .unwrap_or(DEFAULT_REPLY_PAGE_SIZE.into()),
        "comments.reply_page_size",
    )?;
    let sort = match comments.sort {
        Some(value) => value
            .parse()
            .map_err(|err| LoadError::invalid("comments.sort", format!("{err}")))?,
        None => CommentSort::Latest,
    };

    Ok(CommentSettings {
        page_size,
        reply_page_size,
        sort,
    })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let page_size = non_zero_u32(
        search.page_size.unwrap_or(DEFAULT_SEARCH_PAGE_SIZE.into()),
        "search.page_size",
    )?;
    Ok(SearchSettings { page_size })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    category_limit: Option<usize>,
    tag_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCommentSettings {
    page_size: Option<u64>,
    reply_page_size: Option<u64>,
    sort: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    page_size: Option<u64>,
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
