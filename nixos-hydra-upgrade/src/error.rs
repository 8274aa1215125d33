// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ValidationErrors;

/// Top level error. Each variant ends the process with exit code 1.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upgrade failed: {0}")]
    Upgrade(#[from] UpgradeError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Problems found before any external call is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{variable}={value:?} is not a boolean")]
    InvalidBool { variable: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Fatal errors while executing the upgrade. Nothing is retried or rolled
/// back.
#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error("Hydra request failed: {0}")]
    Hydra(#[from] nhu_hydra::Error),

    #[error("Hydra build has no evaluations")]
    NoEvaluation,

    #[error("Failed to read flake metadata for '{flake}': {source}")]
    FlakeMetadata {
        flake: String,
        #[source]
        source: nhu_nix::Error,
    },

    #[error("Cannot derive build target: {0}")]
    Target(#[source] nhu_nix::Error),

    #[error("Failed to build {target}: {source}")]
    Build {
        target: String,
        #[source]
        source: nhu_nix::Error,
    },

    #[error("Failed to switch to {}: {source}", result.display())]
    Switch {
        result: PathBuf,
        #[source]
        source: nhu_nix::Error,
    },

    #[error("Failed to reboot: {0}")]
    Reboot(#[source] nhu_nix::Error),
}
