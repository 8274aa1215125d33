// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! One configuration source, with every field optional.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckLayer {
    #[serde(default, alias = "canaryHosts", alias = "canaryhosts")]
    pub canary_hosts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydraLayer {
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub jobset: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NixBuildLayer {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

/// Values supplied by a single source (flags, environment or file).
///
/// `None` means the source did not set the field, so a lower ranked source
/// (or the default) applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub healthcheck: HealthCheckLayer,
    #[serde(default)]
    pub hydra: HydraLayer,
    #[serde(default, alias = "nix-build")]
    pub nix_build: NixBuildLayer,
    #[serde(default)]
    pub reboot: Option<bool>,
}

impl ConfigLayer {
    /// Places `higher` on top of `self`. Each field set in `higher` replaces
    /// the value below it, lists included.
    pub fn overlay(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            debug: higher.debug.or(self.debug),
            healthcheck: HealthCheckLayer {
                canary_hosts: higher
                    .healthcheck
                    .canary_hosts
                    .or(self.healthcheck.canary_hosts),
            },
            hydra: HydraLayer {
                instance: higher.hydra.instance.or(self.hydra.instance),
                project: higher.hydra.project.or(self.hydra.project),
                jobset: higher.hydra.jobset.or(self.hydra.jobset),
                job: higher.hydra.job.or(self.hydra.job),
            },
            nix_build: NixBuildLayer {
                operation: higher.nix_build.operation.or(self.nix_build.operation),
                host: higher.nix_build.host.or(self.nix_build.host),
                args: higher.nix_build.args.or(self.nix_build.args),
            },
            reboot: higher.reboot.or(self.reboot),
        }
    }
}
