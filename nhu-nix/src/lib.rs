// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Wrappers around the external commands a NixOS upgrade needs.
//!
//! None of these make decisions. Each one runs a single command, checks
//! its exit status and, where the command produces machine readable output,
//! decodes it.
//!
//! - [`Nix`]: `nix flake metadata`, `nix build` and the `dix` closure diff
//! - [`switch_to_configuration`]: activation of a built system
//! - [`System`]: `ping` health probes and `systemctl reboot`
//! - [`flake_to_toplevel`]: flake reference to buildable toplevel attribute

mod command;
mod error;
mod flake;
mod nix;
mod operation;
mod switch;
mod system;

pub use error::{Error, IoContext, Result};
pub use flake::{FlakeMetadata, flake_to_toplevel};
pub use nix::Nix;
pub use operation::Operation;
pub use switch::{CURRENT_SYSTEM, switch_to_configuration};
pub use system::System;
