// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use nhu_nix::Operation;

use crate::config::{ConfigLayer, ConfigSources, HealthCheckLayer, HydraLayer, NixBuildLayer};

/// Performs NixOS system upgrades based on Hydra build success.
///
/// Upgrades a flake based NixOS system to the toplevel derivation of its
/// latest Hydra build, but only once that build succeeded, is newer than the
/// running system, and every canary host answers a ping.
///
/// Every option can also be set in config.yaml or through an NHU_*
/// environment variable (e.g. NHU_HYDRA_INSTANCE). Flags take precedence
/// over the environment, which takes precedence over the file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "nixos-hydra-upgrade", version)]
pub struct Cli {
    /// How to apply the new system [default: boot]
    #[arg(value_parser = PossibleValuesParser::new(Operation::NAMES))]
    pub operation: Option<String>,

    /// Config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Hydra instance (required)
    #[arg(long, value_name = "URL")]
    pub instance: Option<String>,

    /// Hydra project (required)
    #[arg(long)]
    pub project: Option<String>,

    /// Hydra jobset (required)
    #[arg(long)]
    pub jobset: Option<String>,

    /// Hydra job (required)
    #[arg(long)]
    pub job: Option<String>,

    /// Host, the nixosConfigurations attribute to build (required)
    #[arg(long)]
    pub host: Option<String>,

    /// Canary systems, only upgrade if these respond to ping. May be comma
    /// delimited or specified multiple times
    #[arg(long = "canary", value_name = "HOST", value_delimiter = ',')]
    pub canary_hosts: Vec<String>,

    /// Additional args for nix build. May be comma delimited or specified
    /// multiple times
    #[arg(
        long = "build-args",
        visible_alias = "passthru-args",
        value_name = "ARG",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub build_args: Vec<String>,

    /// Reboot system on successful upgrade
    #[arg(long)]
    pub reboot: bool,
}

impl Cli {
    /// Values explicitly given on the command line. Switches that were not
    /// passed and lists with no occurrence leave the field unset.
    pub fn layer(&self) -> ConfigLayer {
        let list = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        ConfigLayer {
            debug: self.debug.then_some(true),
            healthcheck: HealthCheckLayer {
                canary_hosts: list(&self.canary_hosts),
            },
            hydra: HydraLayer {
                instance: self.instance.clone(),
                project: self.project.clone(),
                jobset: self.jobset.clone(),
                job: self.job.clone(),
            },
            nix_build: NixBuildLayer {
                operation: self.operation.clone(),
                host: self.host.clone(),
                args: list(&self.build_args),
            },
            reboot: self.reboot.then_some(true),
        }
    }

    pub fn sources(&self) -> ConfigSources {
        ConfigSources::new(self.layer(), self.config.clone())
    }
}
