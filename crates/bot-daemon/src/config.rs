//! Configuration for the bot daemon.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file (`--config plybot.toml`),
//! 3. environment variables,
//! 4. command-line flags.
//!
//! Environment variables:
//!
//! - `LICHESS_BOT_TOKEN`   (required; the bot credential)
//! - `LICHESS_API_URL`     (default: "https://lichess.org")
//! - `PLYBOT_ENGINE_PATH`  (default: newest `engine-v0.X.Y` in `releases/`)
//! - `PLYBOT_MAX_GAMES`    (default: "4")
//! - `PLYBOT_TT_SIZE_MB`   (default: "64")

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bot_core::DEFAULT_MAX_CONCURRENT_GAMES;
use serde::Deserialize;
use thiserror::Error;

use crate::releases::latest_release;

pub const TOKEN_VAR: &str = "LICHESS_BOT_TOKEN";
pub const DEFAULT_API_URL: &str = "https://lichess.org";
pub const DEFAULT_RELEASES_DIR: &str = "releases";
pub const DEFAULT_TT_SIZE_MB: u32 = 64;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that stop the daemon before any game is played.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    MissingToken(&'static str),

    #[error("invalid value {value:?} for `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no engine configured and no `engine-v0.X.Y` release found in {dir}")]
    NoEngine { dir: PathBuf },
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot account token, sent as a bearer credential.
    pub token: String,

    /// Base URL of the server API.
    pub api_url: String,

    /// Cap on simultaneously running games.
    pub max_games: usize,

    /// Chat lines posted at the start of every new game.
    pub greeting: Vec<String>,

    pub engine: EngineConfig,
}

/// How each game's engine process is started and talked to.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine executable.
    pub path: PathBuf,

    /// Transposition-table size, passed as `--tt-size-mb <n>`.
    pub tt_size_mb: u32,

    /// Extra command-line arguments appended after the table size.
    pub args: Vec<String>,

    /// Bound on one non-search round trip. A search is bounded by the
    /// mover's remaining clock plus this value.
    pub command_timeout: Duration,
}

impl EngineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EngineConfig {
            path: path.into(),
            tt_size_mb: DEFAULT_TT_SIZE_MB,
            args: Vec::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Arguments passed to the engine executable.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec!["--tt-size-mb".to_string(), self.tt_size_mb.to_string()];
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Command-line overrides (highest precedence).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub engine_path: Option<PathBuf>,
    pub max_games: Option<usize>,
    pub tt_size_mb: Option<u32>,
}

/// On-disk TOML layout. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub max_games: Option<usize>,
    pub releases_dir: Option<PathBuf>,
    pub greeting: Option<Vec<String>>,
    pub engine: FileEngineConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileEngineConfig {
    pub path: Option<PathBuf>,
    pub tt_size_mb: Option<u32>,
    pub args: Option<Vec<String>>,
    pub command_timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Resolve the configuration from the file named in `overrides`,
    /// the process environment and the overrides themselves.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match &overrides.config_file {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, overrides, |key| env::var(key).ok())
    }

    /// Layer `file`, the variables visible through `env` and
    /// `overrides` on top of the defaults.
    pub fn resolve<F>(file: FileConfig, overrides: &Overrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = env(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_VAR))?;

        let api_url = env("LICHESS_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let max_games = match overrides.max_games {
            Some(n) => n,
            None => read_env_or("PLYBOT_MAX_GAMES", &env, file.max_games)?
                .unwrap_or(DEFAULT_MAX_CONCURRENT_GAMES),
        };
        if max_games == 0 {
            return Err(ConfigError::Invalid {
                key: "max_games",
                value: "0".to_string(),
                reason: "at least one game must be allowed".to_string(),
            });
        }

        let tt_size_mb = match overrides.tt_size_mb {
            Some(n) => n,
            None => read_env_or("PLYBOT_TT_SIZE_MB", &env, file.engine.tt_size_mb)?
                .unwrap_or(DEFAULT_TT_SIZE_MB),
        };
        if tt_size_mb == 0 {
            return Err(ConfigError::Invalid {
                key: "tt_size_mb",
                value: "0".to_string(),
                reason: "the transposition table needs at least 1 MB".to_string(),
            });
        }

        let path = match overrides
            .engine_path
            .clone()
            .or_else(|| env("PLYBOT_ENGINE_PATH").map(PathBuf::from))
            .or(file.engine.path)
        {
            Some(path) => path,
            None => {
                let dir = file
                    .releases_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RELEASES_DIR));
                match latest_release(&dir) {
                    Ok(Some(path)) => path,
                    _ => return Err(ConfigError::NoEngine { dir }),
                }
            }
        };

        let command_timeout = file
            .engine
            .command_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT);

        Ok(Config {
            token,
            api_url,
            max_games,
            greeting: file.greeting.unwrap_or_default(),
            engine: EngineConfig {
                path,
                tt_size_mb,
                args: file.engine.args.unwrap_or_default(),
                command_timeout,
            },
        })
    }
}

/// Parse `key` from the environment if set, else keep `fallback`.
fn read_env_or<T, F>(key: &'static str, env: &F, fallback: Option<T>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key,
                value: val,
                reason: e.to_string(),
            }),
        None => Ok(fallback),
    }
}
