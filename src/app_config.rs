//! Transfer defaults read from `curlbind/config.toml`.
//!
//! The file is a flat list of `key = value` lines. Strings are double-quoted,
//! `#` starts a comment outside a string, and unknown keys are errors so a
//! typo never silently falls back to a default.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail, ensure};
use tracing::level_filters::LevelFilter;

/// Accepted range for both transfer timeouts, matching the CLI flags.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

/// Transfer defaults. CLI flags win over every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub follow_location: Option<bool>,
    /// Readiness wait per multi drive step, in seconds.
    pub poll_timeout_secs: Option<f64>,
    /// Log filter used when neither `RUST_LOG` nor `-v`/`-q` decides.
    pub log_level: Option<LevelFilter>,
}

/// Where the config was looked for, and what it held.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: Option<PathBuf>,
    pub config: Option<FileConfig>,
}

/// One right-hand side of a config line.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Str(String),
    Number(String),
    Bool(bool),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
        }
    }

    fn into_string(self) -> Result<String> {
        match self {
            Self::Str(s) => Ok(s),
            other => bail!("expected a quoted string, got a {}", other.kind()),
        }
    }

    fn into_bool(self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => bail!("expected true or false, got a {}", other.kind()),
        }
    }

    fn into_number<T>(self) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Self::Number(token) => token
                .parse()
                .with_context(|| format!("'{token}' is not a valid number here")),
            other => bail!("expected a number, got a {}", other.kind()),
        }
    }
}

/// Splits the value part of a line into a scalar, dropping a trailing comment.
fn parse_scalar(raw: &str) -> Result<Scalar> {
    let raw = raw.trim_start();
    if let Some(body) = raw.strip_prefix('"') {
        let end = body
            .find('"')
            .ok_or_else(|| anyhow!("unterminated string"))?;
        let rest = body[end + 1..].trim_start();
        ensure!(
            rest.is_empty() || rest.starts_with('#'),
            "unexpected text after string: '{rest}'"
        );
        return Ok(Scalar::Str(body[..end].to_string()));
    }

    let token = raw.split('#').next().unwrap_or_default().trim();
    match token {
        "" => bail!("missing value"),
        "true" => Ok(Scalar::Bool(true)),
        "false" => Ok(Scalar::Bool(false)),
        _ if token.contains(char::is_whitespace) => {
            bail!("unexpected text in value: '{token}'")
        }
        _ => Ok(Scalar::Number(token.to_string())),
    }
}

impl FileConfig {
    /// Parses config text, naming the offending line on error.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut cfg = Self::default();
        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("line {line_no}: expected `key = value`"))?;
            let key = key.trim();
            parse_scalar(value)
                .and_then(|value| cfg.apply(key, value))
                .with_context(|| format!("line {line_no}: invalid `{key}`"))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply(&mut self, key: &str, value: Scalar) -> Result<()> {
        match key {
            "user_agent" => self.user_agent = Some(value.into_string()?),
            "timeout_secs" => self.timeout_secs = Some(value.into_number()?),
            "connect_timeout_secs" => self.connect_timeout_secs = Some(value.into_number()?),
            "follow_location" => self.follow_location = Some(value.into_bool()?),
            "poll_timeout_secs" => self.poll_timeout_secs = Some(value.into_number()?),
            "log_level" => {
                let level = value.into_string()?;
                self.log_level = Some(
                    LevelFilter::from_str(&level)
                        .map_err(|_| anyhow!("unknown log level '{level}'"))?,
                );
            }
            _ => bail!("unknown configuration key"),
        }
        Ok(())
    }

    /// Checks values against the ranges the CLI flags accept.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("timeout_secs", self.timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if let Some(secs) = value {
                ensure!(
                    TIMEOUT_RANGE.contains(&secs),
                    "`{key}` = {secs} is outside 1..=3600"
                );
            }
        }
        if let Some(poll) = self.poll_timeout_secs {
            ensure!(
                poll.is_finite() && (0.0..=3600.0).contains(&poll),
                "`poll_timeout_secs` = {poll} is outside 0..=3600"
            );
        }
        Ok(())
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file '{}'", path.display()))
    }
}

/// `curlbind/config.toml` under the XDG config home, else under `~/.config`.
fn config_path_with(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let set = |name: &str| lookup(name).filter(|value| !value.is_empty()).map(PathBuf::from);
    let base = set("XDG_CONFIG_HOME").or_else(|| set("HOME").map(|home| home.join(".config")))?;
    Some(base.join("curlbind").join("config.toml"))
}

/// Loads the config file from its default location, if one exists.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = config_path_with(|name| std::env::var_os(name));
    let config = match &path {
        Some(path) if path.is_file() => Some(FileConfig::load(path)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}
