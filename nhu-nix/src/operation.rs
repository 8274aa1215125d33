// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How `switch-to-configuration` applies a built system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    /// Make the configuration the boot default without activating it
    #[default]
    Boot,
    /// Activate now and make it the boot default
    Switch,
    /// Run the activation checks only
    Check,
    /// Show what activation would do
    DryActivate,
    /// Activate now without making it the boot default
    Test,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Boot,
        Operation::Check,
        Operation::DryActivate,
        Operation::Switch,
        Operation::Test,
    ];

    pub const NAMES: [&'static str; 5] = ["boot", "check", "dry-activate", "switch", "test"];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Boot => "boot",
            Operation::Switch => "switch",
            Operation::Check => "check",
            Operation::DryActivate => "dry-activate",
            Operation::Test => "test",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}
