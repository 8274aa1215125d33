// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use serde::Deserialize;

use crate::error::{Error, Result};

/// The parts of `nix flake metadata --json` used to judge freshness.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlakeMetadata {
    /// Flake reference as originally written, before locking
    pub original_url: String,
    /// Unix timestamp of the last commit in the source tree
    pub last_modified: i64,
}

/// Turns a `nixos-rebuild` style flake reference (`repo#host`) into the toplevel
/// derivation attribute that `nix build` understands.
pub fn flake_to_toplevel(flake: &str) -> Result<String> {
    let mut parts = flake.split('#');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(repo), Some(host), None) => Ok(format!(
            "{repo}#nixosConfigurations.{host}.config.system.build.toplevel"
        )),
        _ => Err(Error::MalformedFlake(flake.to_string())),
    }
}
