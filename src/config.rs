//! Engine Configuration
//!
//! Key aliases, capture options and the abort policy. Loaded from a JSON
//! file named by `KEYPROMPT_CONFIG`, or built in code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PromptError, Result};
use crate::terminal::{AbortPolicy, AliasTable, CaptureOptions, Intent, KeyInterpreter};

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV: &str = "KEYPROMPT_CONFIG";

/// Configuration shared by every prompt session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra aliases, merged over the built-in escape/Ctrl+C cancel aliases
    pub aliases: AliasTable,
    pub capture: CaptureOptions,
    pub abort_policy: AbortPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aliases: AliasTable::empty(),
            capture: CaptureOptions::default(),
            abort_policy: AbortPolicy::Surface,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PromptError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from `KEYPROMPT_CONFIG` if set, defaults otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Add an alias
    pub fn with_alias(mut self, key: impl Into<String>, intent: Intent) -> Self {
        self.aliases.set(key, intent);
        self
    }

    pub fn with_capture(mut self, capture: CaptureOptions) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_abort_policy(mut self, policy: AbortPolicy) -> Self {
        self.abort_policy = policy;
        self
    }

    /// Interpreter over the built-in aliases plus the configured ones
    pub fn interpreter(&self) -> KeyInterpreter {
        let mut aliases = AliasTable::default();
        aliases.extend(&self.aliases);
        KeyInterpreter::new(aliases)
    }

    /// Human-readable summary lines
    pub fn get_summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Hide cursor: {}", self.capture.hide_cursor),
            format!("Overwrite swallowed keys: {}", self.capture.overwrite),
            format!("Honour cancel aliases while blocked: {}", self.capture.signal),
            format!("Abort policy: {:?}", self.abort_policy),
        ];
        for (key, intent) in self.interpreter().aliases().entries() {
            lines.push(format!("Alias {:?} -> {:?}", key, intent));
        }
        lines
    }
}
