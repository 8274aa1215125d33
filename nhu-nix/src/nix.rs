// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;

use crate::command;
use crate::error::{Error, Result};
use crate::flake::FlakeMetadata;

#[derive(Deserialize)]
struct BuildOutputs {
    out: PathBuf,
}

#[derive(Deserialize)]
struct BuildResult {
    outputs: BuildOutputs,
}

/// Runs the `nix` and `dix` command line tools.
#[derive(Debug, Clone)]
pub struct Nix {
    nix: PathBuf,
    dix: PathBuf,
}

impl Default for Nix {
    fn default() -> Self {
        Self {
            nix: PathBuf::from("nix"),
            dix: PathBuf::from("dix"),
        }
    }
}

impl Nix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nix(mut self, program: impl Into<PathBuf>) -> Self {
        self.nix = program.into();
        self
    }

    pub fn with_dix(mut self, program: impl Into<PathBuf>) -> Self {
        self.dix = program.into();
        self
    }

    fn nix_command(&self) -> Command {
        let mut cmd = Command::new(&self.nix);
        cmd.arg("--extra-experimental-features")
            .arg("nix-command flakes");
        cmd
    }

    /// `nix flake metadata --json <flake>`
    pub async fn flake_metadata(&self, flake: &str) -> Result<FlakeMetadata> {
        let mut cmd = self.nix_command();
        cmd.args(["flake", "metadata", "--json"]).arg(flake);
        let stdout = command::output(&mut cmd).await?;
        command::decode(&cmd, &stdout)
    }

    /// `nix build <toplevel> --no-link --json <args>`, returning the `out`
    /// path of the first result.
    pub async fn build(&self, toplevel: &str, args: &[String]) -> Result<PathBuf> {
        let mut cmd = self.nix_command();
        cmd.arg("build")
            .arg(toplevel)
            .args(["--no-link", "--json"])
            .args(args);
        let stdout = command::output(&mut cmd).await?;
        let results: Vec<BuildResult> = command::decode(&cmd, &stdout)?;
        results
            .into_iter()
            .next()
            .map(|r| r.outputs.out)
            .ok_or_else(|| Error::NoBuildOutput(toplevel.to_string()))
    }

    /// Prints a closure diff between two system paths for the operator.
    pub async fn diff(&self, old: &Path, new: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.dix);
        cmd.arg(old).arg(new);
        command::status(&mut cmd).await
    }
}
