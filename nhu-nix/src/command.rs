// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, IoContext, Result};

/// Renders a command the way a user would type it, for logs and errors.
pub(crate) fn describe(cmd: &Command) -> String {
    let std = cmd.as_std();
    std::iter::once(std.get_program())
        .chain(std.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `cmd` with stdout captured and stderr passed through.
pub(crate) async fn output(cmd: &mut Command) -> Result<Vec<u8>> {
    let command = describe(cmd);
    log::debug!(command = command.as_str(); "running");
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .await
        .io_context(|| format!("Failed to execute `{command}`"))?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            command,
            status: output.status,
        });
    }
    Ok(output.stdout)
}

/// Runs `cmd` with stdout and stderr passed through.
pub(crate) async fn status(cmd: &mut Command) -> Result<()> {
    let command = describe(cmd);
    log::debug!(command = command.as_str(); "running");
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .io_context(|| format!("Failed to execute `{command}`"))?;
    if !status.success() {
        return Err(Error::CommandFailed { command, status });
    }
    Ok(())
}

/// Decodes JSON printed by `cmd`.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(cmd: &Command, stdout: &[u8]) -> Result<T> {
    serde_json::from_slice(stdout).map_err(|source| Error::Decode {
        command: describe(cmd),
        source,
    })
}
