//! Environment file store
//!
//! Reads the text form printed by `fw_printenv`: one `name=value` per line.
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{bail, Context, Result};
use envparts::EnvStore;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read environment {}", path.display()))?;
        let env = Self::parse(&text)
            .with_context(|| format!("invalid environment {}", path.display()))?;
        tracing::debug!("Loaded {} variables from {}", env.len(), path.display());
        Ok(env)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut vars = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                bail!("line {}: expected name=value", lineno + 1);
            };
            let name = name.trim();
            if name.is_empty() {
                bail!("line {}: empty variable name", lineno + 1);
            }
            // Later assignments win, as with repeated setenv
            vars.insert(name.to_string(), value.to_string());
        }
        Ok(Self { vars })
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

impl EnvStore for EnvFile {
    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}
