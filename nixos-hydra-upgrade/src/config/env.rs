// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! `NHU_*` environment variables.

use std::collections::BTreeMap;

use super::keys;
use super::layer::ConfigLayer;
use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "NHU";

/// Older spelling of the canary list variable. Read only when
/// `NHU_HEALTHCHECK_CANARY_HOSTS` is absent.
pub const CANARY_HOSTS_COMPAT_VAR: &str = "NHU_HEALTHCHECK_CANARYHOSTS";

/// Name of the environment variable for a dotted key path, e.g.
/// `nix_build.args` is read from `NHU_NIX_BUILD_ARGS`.
pub fn env_var(key: &str) -> String {
    format!(
        "{ENV_PREFIX}_{}",
        key.to_ascii_uppercase().replace(['.', '-'], "_")
    )
}

/// Snapshot of the process environment, skipping variables that are not
/// valid UTF-8.
pub fn process_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Comma separated list. Elements are trimmed but empty elements are kept so
/// that validation can report them; an empty string is an empty list.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            variable: env_var(key),
            value: value.to_string(),
        }),
    }
}

/// Builds a layer from the `NHU_*` entries of `vars`.
///
/// Scalars and booleans set to the empty string count as unset. Lists set to
/// the empty string are the empty list.
pub fn from_vars(vars: &BTreeMap<String, String>) -> Result<ConfigLayer, ConfigError> {
    let get = |key: &str| vars.get(&env_var(key)).map(String::as_str);
    let scalar = |key: &str| get(key).filter(|v| !v.is_empty());
    let string = |key: &str| scalar(key).map(str::to_string);
    let boolean = |key: &str| scalar(key).map(|v| parse_bool(key, v)).transpose();
    let list = |key: &str| get(key).map(split_list);

    let mut layer = ConfigLayer {
        debug: boolean(keys::DEBUG)?,
        reboot: boolean(keys::REBOOT)?,
        ..Default::default()
    };
    layer.healthcheck.canary_hosts = list(keys::CANARY_HOSTS)
        .or_else(|| vars.get(CANARY_HOSTS_COMPAT_VAR).map(|v| split_list(v)));
    layer.hydra.instance = string(keys::INSTANCE);
    layer.hydra.project = string(keys::PROJECT);
    layer.hydra.jobset = string(keys::JOBSET);
    layer.hydra.job = string(keys::JOB);
    layer.nix_build.operation = string(keys::OPERATION);
    layer.nix_build.host = string(keys::HOST);
    layer.nix_build.args = list(keys::ARGS);
    Ok(layer)
}
