//! Harness configuration: session settings, polling defaults, build root.
//!
//! `HarnessConfig::from_env()` starts from `Default` and applies any
//! `FRAMECHECK_*` overrides. Malformed values are reported by `validate`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_MASTER: &str = "FRAMECHECK_MASTER";
pub const ENV_APP_NAME: &str = "FRAMECHECK_APP_NAME";
pub const ENV_ARROW_ENABLED: &str = "FRAMECHECK_ARROW_ENABLED";
pub const ENV_EVENTUALLY_TIMEOUT: &str = "FRAMECHECK_EVENTUALLY_TIMEOUT";
pub const ENV_POLL_INTERVAL_MS: &str = "FRAMECHECK_POLL_INTERVAL_MS";
pub const ENV_HOME: &str = "FRAMECHECK_HOME";
/// Fallback for `ENV_HOME`, matching the layout of the framework's own checkout.
pub const ENV_SPARK_HOME: &str = "SPARK_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// `local`, `local[N]` or `local[*]`.
    pub master: String,
    pub app_name: String,
    /// Columnar (Arrow) transfer when gathering partitions.
    pub arrow_enabled: bool,
    pub eventually_timeout_secs: f64,
    pub poll_interval_ms: u64,
    /// Build root searched by the artifact locator.
    pub home: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            master: "local[4]".into(),
            app_name: "framecheck".into(),
            arrow_enabled: true,
            eventually_timeout_secs: 30.0,
            poll_interval_ms: 10,
            home: None,
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable lookup (tests avoid touching the
    /// process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_MASTER) {
            cfg.master = v;
        }
        if let Some(v) = lookup(ENV_APP_NAME) {
            cfg.app_name = v;
        }
        if let Some(v) = lookup(ENV_ARROW_ENABLED) {
            cfg.arrow_enabled = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(v) = lookup(ENV_EVENTUALLY_TIMEOUT).and_then(|v| v.trim().parse().ok()) {
            cfg.eventually_timeout_secs = v;
        }
        if let Some(v) = lookup(ENV_POLL_INTERVAL_MS).and_then(|v| v.trim().parse().ok()) {
            cfg.poll_interval_ms = v;
        }
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.is_empty());
        cfg.home = non_empty(ENV_HOME)
            .or_else(|| non_empty(ENV_SPARK_HOME))
            .map(PathBuf::from);
        cfg
    }

    pub fn with_master(mut self, master: impl Into<String>) -> Self {
        self.master = master.into();
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_arrow_enabled(mut self, enabled: bool) -> Self {
        self.arrow_enabled = enabled;
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Worker threads implied by `master`; `local[*]` uses the host's parallelism.
    pub fn parallelism(&self) -> Result<usize> {
        let master = self.master.trim();
        if master == "local" {
            return Ok(1);
        }
        let inner = master
            .strip_prefix("local[")
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| Error::Config(format!("unsupported master '{}'", master)))?;
        if inner == "*" {
            return Ok(std::thread::available_parallelism().map_or(1, |n| n.get()));
        }
        match inner.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::Config(format!("invalid thread count in master '{}'", master))),
        }
    }

    /// Build root, or a configuration error naming the variables to set.
    pub fn require_home(&self) -> Result<&PathBuf> {
        self.home.as_ref().ok_or_else(|| {
            Error::Config(format!("build home is not set ({} or {})", ENV_HOME, ENV_SPARK_HOME))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.parallelism()?;
        if !(self.eventually_timeout_secs > 0.0) {
            return Err(Error::Config(format!(
                "eventually timeout must be positive, got {}",
                self.eventually_timeout_secs
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be at least 1 ms".into()));
        }
        Ok(())
    }
}
