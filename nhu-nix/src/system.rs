// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use tokio::process::Command;

use crate::command;
use crate::error::Result;

const PING_COUNT: &str = "3";

/// Host level commands: reachability probes and reboot.
#[derive(Debug, Clone)]
pub struct System {
    ping: PathBuf,
    systemctl: PathBuf,
}

impl Default for System {
    fn default() -> Self {
        Self {
            ping: PathBuf::from("ping"),
            systemctl: PathBuf::from("systemctl"),
        }
    }
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ping(mut self, program: impl Into<PathBuf>) -> Self {
        self.ping = program.into();
        self
    }

    pub fn with_systemctl(mut self, program: impl Into<PathBuf>) -> Self {
        self.systemctl = program.into();
        self
    }

    /// Sends three echo requests to `host`. Fails only when no reply
    /// arrives at all; partial loss still passes.
    pub async fn ping(&self, host: &str) -> Result<()> {
        let mut cmd = Command::new(&self.ping);
        cmd.args(["-q", "-c", PING_COUNT, "--", host]);
        let stdout = command::output(&mut cmd).await?;
        let stats = String::from_utf8_lossy(&stdout);
        log::debug!(host = host, stats = stats.trim(); "ping statistics");
        Ok(())
    }

    /// `systemctl reboot`. On a real host this does not come back.
    pub async fn reboot(&self) -> Result<()> {
        let mut cmd = Command::new(&self.systemctl);
        cmd.arg("reboot");
        command::status(&mut cmd).await
    }
}
