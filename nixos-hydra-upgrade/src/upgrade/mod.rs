// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! The upgrade decision pipeline.
//!
//! A run walks these steps in order and stops at the first one that ends it:
//!
//! 1. fetch the latest Hydra build of the configured job
//! 2. stop (exit 0) if it has not finished
//! 3. stop (exit 1) if it did not succeed
//! 4. look up the evaluation that produced it
//! 5. stop (exit 0) if the running system is at least as new
//! 6. ping every canary host, stop (exit 1) at the first failure
//! 7. `nix build` the host's toplevel from the evaluated flake
//! 8. diff against the running system (failures are only logged)
//! 9. `switch-to-configuration` with the configured operation
//! 10. reboot when configured
//!
//! Nothing that changes the host runs before every gate has passed.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};
use nhu_nix::{CURRENT_SYSTEM, FlakeMetadata, flake_to_toplevel};

use crate::config::Config;
use crate::error::UpgradeError;

mod collaborators;

pub use collaborators::{HostControl, Hydra, NixTools};

/// Flake registry entry of the running system's own source.
pub const SELF_FLAKE: &str = "self";

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Hydra has not finished building the latest job yet
    BuildUnfinished,
    /// The latest build failed with this Hydra build status
    BuildFailed { status: Option<i64> },
    /// The running system is at least as new as the latest build
    UpToDate { local: i64, remote: i64 },
    /// A canary host did not answer
    CanaryUnreachable { host: String },
    /// The new system was built and activated
    Upgraded { result: PathBuf, rebooted: bool },
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::BuildFailed { .. } | Outcome::CanaryUnreachable { .. } => 1,
            Outcome::BuildUnfinished | Outcome::UpToDate { .. } | Outcome::Upgraded { .. } => 0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::BuildUnfinished => f.write_str("latest build unfinished"),
            Outcome::BuildFailed { status: Some(s) } => {
                write!(f, "latest build unsuccessful (buildstatus {s})")
            }
            Outcome::BuildFailed { status: None } => {
                f.write_str("latest build unsuccessful (no buildstatus)")
            }
            Outcome::UpToDate { .. } => f.write_str("system is already up to date"),
            Outcome::CanaryUnreachable { host } => write!(f, "canary host {host} unreachable"),
            Outcome::Upgraded { result, .. } => {
                write!(f, "system upgraded to {}", result.display())
            }
        }
    }
}

/// One upgrade attempt for this host.
pub struct Upgrade<'a, H, N, S> {
    config: &'a Config,
    hydra: H,
    nix: N,
    host: S,
}

impl<'a, H, N, S> Upgrade<'a, H, N, S>
where
    H: Hydra,
    N: NixTools,
    S: HostControl,
{
    pub fn new(config: &'a Config, hydra: H, nix: N, host: S) -> Self {
        Self {
            config,
            hydra,
            nix,
            host,
        }
    }

    pub async fn run(&self) -> Result<Outcome, UpgradeError> {
        let build = self.hydra.latest_build().await?;
        if !build.is_finished() {
            info!("Latest build unfinished. Exiting.");
            return Ok(Outcome::BuildUnfinished);
        }
        if !build.is_success() {
            info!(buildstatus:? = build.buildstatus; "Latest build unsuccessful. Exiting.");
            return Ok(Outcome::BuildFailed {
                status: build.buildstatus,
            });
        }

        let eval_id = build.eval_id().ok_or(UpgradeError::NoEvaluation)?;
        let eval = self.hydra.eval(eval_id).await?;
        info!(eval = eval_id, flake = eval.flake.as_str(); "Latest build succeeded");

        let local = self.flake_metadata(SELF_FLAKE).await?;
        let remote = self.flake_metadata(&eval.flake).await?;
        if local.last_modified >= remote.last_modified {
            info!(
                local = local.last_modified,
                remote = remote.last_modified;
                "System is already up to date. Exiting."
            );
            return Ok(Outcome::UpToDate {
                local: local.last_modified,
                remote: remote.last_modified,
            });
        }

        if let Some(host) = self.unreachable_canary().await {
            return Ok(Outcome::CanaryUnreachable { host });
        }

        let nix_build = &self.config.nix_build;
        let flake = format!("{}#{}", remote.original_url, nix_build.host);
        let toplevel = flake_to_toplevel(&flake).map_err(UpgradeError::Target)?;
        info!(flake = flake.as_str(); "Performing system upgrade.");

        let result = self
            .nix
            .build(&toplevel, &nix_build.args)
            .await
            .map_err(|source| UpgradeError::Build {
                target: toplevel.clone(),
                source,
            })?;
        info!(result:? = result; "Build complete");

        if let Err(e) = self.nix.diff(Path::new(CURRENT_SYSTEM), &result).await {
            warn!(error:% = e; "Unexpected diff error");
        }

        self.nix
            .switch_to_configuration(&result, nix_build.operation)
            .await
            .map_err(|source| UpgradeError::Switch {
                result: result.clone(),
                source,
            })?;
        info!(
            flake = flake.as_str(),
            operation = nix_build.operation.as_str();
            "System upgrade complete."
        );

        if self.config.reboot {
            info!("Initiating reboot");
            self.host.reboot().await.map_err(UpgradeError::Reboot)?;
        }

        Ok(Outcome::Upgraded {
            result,
            rebooted: self.config.reboot,
        })
    }

    async fn flake_metadata(&self, flake: &str) -> Result<FlakeMetadata, UpgradeError> {
        self.nix
            .flake_metadata(flake)
            .await
            .map_err(|source| UpgradeError::FlakeMetadata {
                flake: flake.to_string(),
                source,
            })
    }

    /// Pings canaries in order and returns the first one that fails.
    async fn unreachable_canary(&self) -> Option<String> {
        for canary in &self.config.health_check.canary_hosts {
            match self.host.ping(canary).await {
                Ok(()) => info!(host = canary.as_str(); "Ping healthcheck passed"),
                Err(e) => {
                    warn!(host = canary.as_str(), error:% = e; "Ping healthcheck failed. Exiting.");
                    return Some(canary.clone());
                }
            }
        }
        None
    }
}
