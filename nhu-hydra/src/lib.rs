// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Read-only client for the Hydra CI JSON API.
//!
//! Only the two lookups needed to gate a NixOS upgrade are implemented:
//!
//! - the latest build of a job (`/job/{project}/{jobset}/{job}/latest`)
//! - the evaluation that produced a build (`/eval/{id}`)
//!
//! The response types are partial: they carry only the fields the upgrade
//! pipeline reads. See `hydra-api.yaml` in the Hydra repository for the
//! full schema.
//!
//! # Example
//!
//! ```ignore
//! use nhu_hydra::{HydraClient, JobCoordinates};
//!
//! let client = HydraClient::new(instance, JobCoordinates::new("nix-config", "main", "hosts.oak"))?;
//! let build = client.latest_build().await?;
//! if let (true, Some(id)) = (build.is_success(), build.eval_id()) {
//!     let eval = client.eval(id).await?;
//!     println!("built from {}", eval.flake);
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{HydraClient, JobCoordinates};
pub use error::{Error, Result};
pub use types::{Build, Eval};
