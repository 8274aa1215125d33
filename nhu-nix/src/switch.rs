// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::path::Path;

use tokio::process::Command;

use crate::command;
use crate::error::{Error, Result};
use crate::operation::Operation;

/// Symlink to the system closure that is currently active.
pub const CURRENT_SYSTEM: &str = "/run/current-system";

/// Runs `<result>/bin/switch-to-configuration <operation>` for a built
/// toplevel derivation.
pub async fn switch_to_configuration(result: &Path, operation: Operation) -> Result<()> {
    let switch_bin = result.join("bin").join("switch-to-configuration");

    tokio::fs::metadata(&switch_bin)
        .await
        .map_err(|source| Error::MissingSwitchBinary {
            path: switch_bin.clone(),
            source,
        })?;

    let mut cmd = Command::new(&switch_bin);
    cmd.arg(operation.as_str());
    command::status(&mut cmd).await
}
