// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! YAML configuration file.

use std::path::{Path, PathBuf};

use super::layer::ConfigLayer;
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directories searched, in order, when no file is given explicitly.
pub fn default_search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/etc/nixos-hydra-upgrade"),
        PathBuf::from("."),
    ]
}

pub fn parse(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    // serde_yaml rejects an empty document for a struct
    if contents.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

/// Reads the explicitly given file, or the first `config.yaml` found in
/// `search_paths`. Finding no file at all is not an error.
pub fn load(
    explicit: Option<&Path>,
    search_paths: &[PathBuf],
) -> Result<(ConfigLayer, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        return Ok((read(path)?, Some(path.to_path_buf())));
    }
    for dir in search_paths {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok((read(&candidate)?, Some(candidate)));
        }
    }
    Ok((ConfigLayer::default(), None))
}
