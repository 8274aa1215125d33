// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Upgrades a NixOS host to the newest system configuration that Hydra
//! built successfully.
//!
//! The binary resolves a [`config::Config`] once, hands it to an
//! [`upgrade::Upgrade`] together with the Hydra client and the command
//! wrappers, and turns the returned [`upgrade::Outcome`] (or
//! [`error::Error`]) into the process exit code.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod upgrade;

pub use error::{Error, Result};
