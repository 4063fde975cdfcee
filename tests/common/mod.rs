// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use cfghub::domain::{ConfigMap, ConfigValue};
use std::env;
use std::path::{Path, PathBuf};

/// Builds an ordered mapping from pairs.
#[allow(dead_code)]
pub fn map(pairs: &[(&str, ConfigValue)]) -> ConfigMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Writes `content` to `dir/name` and returns the path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

/// Sets environment variables and removes them on drop.
///
/// Variable names must be unique per test since tests run in parallel.
#[allow(dead_code)]
pub struct EnvGuard {
    keys: Vec<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn new() -> Self {
        EnvGuard { keys: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
        self.keys.push(key.to_string());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            env::remove_var(key);
        }
    }
}
