// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Seams between the pipeline and the outside world.

use std::future::Future;
use std::path::{Path, PathBuf};

use nhu_hydra::{Build, Eval, HydraClient};
use nhu_nix::{FlakeMetadata, Nix, Operation, System};

/// Build status lookups.
pub trait Hydra: Sync {
    fn latest_build(&self) -> impl Future<Output = nhu_hydra::Result<Build>> + Send;

    fn eval(&self, id: u64) -> impl Future<Output = nhu_hydra::Result<Eval>> + Send;
}

/// Nix store side: metadata, build, diff, activation.
pub trait NixTools: Sync {
    fn flake_metadata(
        &self,
        flake: &str,
    ) -> impl Future<Output = nhu_nix::Result<FlakeMetadata>> + Send;

    fn build(
        &self,
        toplevel: &str,
        args: &[String],
    ) -> impl Future<Output = nhu_nix::Result<PathBuf>> + Send;

    fn diff(&self, old: &Path, new: &Path) -> impl Future<Output = nhu_nix::Result<()>> + Send;

    fn switch_to_configuration(
        &self,
        result: &Path,
        operation: Operation,
    ) -> impl Future<Output = nhu_nix::Result<()>> + Send;
}

/// Host side: health probes and reboot.
pub trait HostControl: Sync {
    fn ping(&self, host: &str) -> impl Future<Output = nhu_nix::Result<()>> + Send;

    fn reboot(&self) -> impl Future<Output = nhu_nix::Result<()>> + Send;
}

impl Hydra for HydraClient {
    fn latest_build(&self) -> impl Future<Output = nhu_hydra::Result<Build>> + Send {
        HydraClient::latest_build(self)
    }

    fn eval(&self, id: u64) -> impl Future<Output = nhu_hydra::Result<Eval>> + Send {
        HydraClient::eval(self, id)
    }
}

impl NixTools for Nix {
    fn flake_metadata(
        &self,
        flake: &str,
    ) -> impl Future<Output = nhu_nix::Result<FlakeMetadata>> + Send {
        Nix::flake_metadata(self, flake)
    }

    fn build(
        &self,
        toplevel: &str,
        args: &[String],
    ) -> impl Future<Output = nhu_nix::Result<PathBuf>> + Send {
        Nix::build(self, toplevel, args)
    }

    fn diff(&self, old: &Path, new: &Path) -> impl Future<Output = nhu_nix::Result<()>> + Send {
        Nix::diff(self, old, new)
    }

    fn switch_to_configuration(
        &self,
        result: &Path,
        operation: Operation,
    ) -> impl Future<Output = nhu_nix::Result<()>> + Send {
        nhu_nix::switch_to_configuration(result, operation)
    }
}

impl HostControl for System {
    fn ping(&self, host: &str) -> impl Future<Output = nhu_nix::Result<()>> + Send {
        System::ping(self, host)
    }

    fn reboot(&self) -> impl Future<Output = nhu_nix::Result<()>> + Send {
        System::reboot(self)
    }
}
