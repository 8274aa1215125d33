// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Layered configuration.
//!
//! Values come from, highest rank first: command line flags, `NHU_*`
//! environment variables, a YAML file, built-in defaults. Each field is taken
//! whole from the highest ranked source that sets it. Lists are never merged
//! across sources.
//!
//! Resolution happens in two steps so that the defaults can be inspected
//! before validation:
//!
//! 1. [`resolve`] merges the sources into [`Settings`] (plain strings)
//! 2. [`Settings::validate`] checks every rule and produces a typed [`Config`]

use std::collections::BTreeMap;
use std::path::PathBuf;

use nhu_hydra::JobCoordinates;
use nhu_nix::Operation;
use url::Url;

use crate::error::ConfigError;

pub mod env;
pub mod file;
mod layer;
mod validate;

pub use env::{CANARY_HOSTS_COMPAT_VAR, ENV_PREFIX, env_var};
pub use file::CONFIG_FILE_NAME;
pub use layer::{ConfigLayer, HealthCheckLayer, HydraLayer, NixBuildLayer};
pub use validate::{Problem, ValidationErrors, Violation};

/// Dotted key paths, shared by the YAML layout and the environment names.
pub mod keys {
    pub const DEBUG: &str = "debug";
    pub const CANARY_HOSTS: &str = "healthcheck.canary_hosts";
    pub const INSTANCE: &str = "hydra.instance";
    pub const PROJECT: &str = "hydra.project";
    pub const JOBSET: &str = "hydra.jobset";
    pub const JOB: &str = "hydra.job";
    pub const OPERATION: &str = "nix_build.operation";
    pub const HOST: &str = "nix_build.host";
    pub const ARGS: &str = "nix_build.args";
    pub const REBOOT: &str = "reboot";

    pub const ALL: [&str; 10] = [
        DEBUG,
        CANARY_HOSTS,
        INSTANCE,
        PROJECT,
        JOBSET,
        JOB,
        OPERATION,
        HOST,
        ARGS,
        REBOOT,
    ];
}

/// Merged, defaulted but not yet validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub debug: bool,
    pub canary_hosts: Vec<String>,
    pub instance: String,
    pub project: String,
    pub jobset: String,
    pub job: String,
    pub operation: String,
    pub host: String,
    pub args: Vec<String>,
    pub reboot: bool,
    /// File the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl From<ConfigLayer> for Settings {
    fn from(layer: ConfigLayer) -> Self {
        Settings {
            debug: layer.debug.unwrap_or(false),
            canary_hosts: layer.healthcheck.canary_hosts.unwrap_or_default(),
            instance: layer.hydra.instance.unwrap_or_default(),
            project: layer.hydra.project.unwrap_or_default(),
            jobset: layer.hydra.jobset.unwrap_or_default(),
            job: layer.hydra.job.unwrap_or_default(),
            operation: layer
                .nix_build
                .operation
                .unwrap_or_else(|| Operation::default().to_string()),
            host: layer.nix_build.host.unwrap_or_default(),
            args: layer.nix_build.args.unwrap_or_default(),
            reboot: layer.reboot.unwrap_or(false),
            config_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Hosts that must answer a ping before an upgrade proceeds
    pub canary_hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydraConfig {
    pub instance: Url,
    pub project: String,
    pub jobset: String,
    pub job: String,
}

impl HydraConfig {
    pub fn coordinates(&self) -> JobCoordinates {
        JobCoordinates::new(&self.project, &self.jobset, &self.job)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NixBuildConfig {
    pub operation: Operation,
    /// `nixosConfigurations` attribute of the host to build
    pub host: String,
    /// Extra arguments for `nix build`
    pub args: Vec<String>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,
    pub health_check: HealthCheckConfig,
    pub hydra: HydraConfig,
    pub nix_build: NixBuildConfig,
    pub reboot: bool,
}

/// Everything [`resolve`] reads from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Values given on the command line
    pub flags: ConfigLayer,
    /// `--config`; when set, the file must exist
    pub config_file: Option<PathBuf>,
    /// Directories searched for `config.yaml` when `config_file` is unset
    pub search_paths: Vec<PathBuf>,
    /// Environment snapshot
    pub env: BTreeMap<String, String>,
}

impl ConfigSources {
    /// Sources for a real run: the process environment and the default
    /// search paths.
    pub fn new(flags: ConfigLayer, config_file: Option<PathBuf>) -> Self {
        Self {
            flags,
            config_file,
            search_paths: file::default_search_paths(),
            env: env::process_env(),
        }
    }
}

/// Merges all sources into [`Settings`].
pub fn resolve(sources: &ConfigSources) -> Result<Settings, ConfigError> {
    let (file_layer, found) =
        file::load(sources.config_file.as_deref(), &sources.search_paths)?;
    let env_layer = env::from_vars(&sources.env)?;
    Ok(Settings {
        config_file: found,
        ..Settings::from(file_layer.overlay(env_layer).overlay(sources.flags.clone()))
    })
}

/// [`resolve`] followed by [`Settings::validate`].
pub fn load(sources: &ConfigSources) -> Result<Config, ConfigError> {
    Ok(resolve(sources)?.validate()?)
}
