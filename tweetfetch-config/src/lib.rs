//! Loader for tweetfetch configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, environment last wins:
//!
//! ```yaml
//! twitter:
//!   api_key: "${TWITTER_API_KEY}"
//!   api_secret: "${TWITTER_API_SECRET}"
//!   base_url: "https://api.twitter.com"   # optional
//!   user_agent: "TweetFetcher"            # optional
//! logging:
//!   format: text          # or json
//!   emit_stderr: false
//!   filter: info
//!   dir: ~/.local/share/tweetfetch
//! ```
//!
//! Environment overrides use the `TWEETFETCH__` prefix with `__` between
//! levels, e.g. `TWEETFETCH__TWITTER__API_KEY`. `${VAR}` placeholders in any
//! string value are expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tweetfetch_common::observability::{LogConfig, LogFormat};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetfetchConfig {
    #[serde(default)]
    pub twitter: TwitterSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Credentials and endpoint for the platform API.
///
/// Blank credentials load fine; the client rejects them when it is built.
#[derive(Clone, Deserialize)]
pub struct TwitterSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for TwitterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("api_secret", &redacted(&self.api_secret))
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub emit_stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            emit_stderr: false,
            filter: default_filter(),
            dir: None,
        }
    }
}

impl LoggingSettings {
    /// Settings for [`tweetfetch_common::observability::init_logging`].
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn default_base_url() -> String {
    "https://api.twitter.com".into()
}
fn default_user_agent() -> String {
    "TweetFetcher".into()
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct TweetfetchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for TweetfetchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetfetchConfigLoader {
    /// Start with no files and `TWEETFETCH__` env overrides.
    ///
    /// ```
    /// use tweetfetch_config::TweetfetchConfigLoader;
    ///
    /// let config = TweetfetchConfigLoader::new()
    ///     .with_yaml_str("twitter:\n  api_key: abc\n  api_secret: def")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.twitter.api_key, "abc");
    /// assert_eq!(config.twitter.base_url, "https://api.twitter.com");
    /// assert_eq!(config.logging.filter, "info");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix("TWEETFETCH").separator("__"),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate
    /// infers the format from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`Self::with_file`], but a missing file is skipped so the
    /// environment alone can carry the configuration.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use tweetfetch_config::TweetfetchConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_TWITTER_SECRET", "injected-from-env"); }
    ///
    /// let config = TweetfetchConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// twitter:
    ///   api_key: "key"
    ///   api_secret: "${DOC_TWITTER_SECRET}"
    /// logging:
    ///   format: json
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.twitter.api_secret, "injected-from-env");
    /// assert_eq!(config.logging.format, tweetfetch_common::observability::LogFormat::Json);
    ///
    /// unsafe { std::env::remove_var("DOC_TWITTER_SECRET"); }
    /// ```
    pub fn load(self) -> Result<TweetfetchConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Round-trip through `config` so env strings coerce to bools and
        // numeric YAML scalars coerce to strings.
        Config::try_from(&v)?.try_deserialize()
    }
}
