// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use serde::Deserialize;

/// A Hydra build. Here these are host toplevel derivations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Build {
    /// 1 when the build has finished, anything else otherwise
    pub finished: i64,
    /// 0 on success. Hydra sends `null` while the build is still queued.
    #[serde(default)]
    pub buildstatus: Option<i64>,
    /// Evaluations that contain this build. The first one is authoritative.
    #[serde(default)]
    pub jobsetevals: Vec<u64>,
}

impl Build {
    pub fn is_finished(&self) -> bool {
        self.finished == 1
    }

    pub fn is_success(&self) -> bool {
        self.buildstatus == Some(0)
    }

    pub fn eval_id(&self) -> Option<u64> {
        self.jobsetevals.first().copied()
    }
}

/// A jobset evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Eval {
    /// Locked flake reference for the commit that was evaluated
    pub flake: String,
}
