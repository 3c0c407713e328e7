//! Desk configuration.
//!
//! Loaded from `~/.dispatch/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dashboard::DEFAULT_ONGOING_LIMIT;
use crate::desk::Policy;

/// Desk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Operator recorded on user actions when `--as` and
    /// `DISPATCH_OPERATOR` are not set.
    pub operator: Option<String>,

    /// Reject status changes outside the lifecycle tables.
    pub enforce_transitions: bool,

    /// Reject assignments to unknown or busy ambulances.
    pub validate_assignments: bool,

    /// Size of the dashboard's ongoing-requests panel.
    pub ongoing_limit: usize,

    /// Seed file used instead of the built-in shift.
    pub seed: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator: None,
            enforce_transitions: false,
            validate_assignments: false,
            ongoing_limit: DEFAULT_ONGOING_LIMIT,
            seed: None,
        }
    }
}

impl Config {
    /// Load config from `~/.dispatch/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.ongoing_limit == 0 {
            return Err(format!(
                "ongoing-limit must be at least 1 in {}",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.dispatch/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dispatch").join("config.toml"))
    }

    /// The edit checks this config asks for.
    pub fn policy(&self) -> Policy {
        Policy {
            enforce_transitions: self.enforce_transitions,
            validate_assignments: self.validate_assignments,
        }
    }
}
