// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::fmt;

use nhu_nix::Operation;
use thiserror::Error;
use url::Url;

use super::keys;
use super::{Config, HealthCheckConfig, HydraConfig, NixBuildConfig, Settings};

/// What is wrong with a single configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("is required")]
    Required,

    #[error("is not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("'{0}' is not one of {ops}", ops = Operation::NAMES.join(", "))]
    UnknownOperation(String),

    #[error("element {0} is empty")]
    EmptyElement(usize),
}

/// A failed validation rule, located by its dotted key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub key: &'static str,
    pub problem: Problem,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.problem)
    }
}

/// Every rule a configuration violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn first(&self) -> Option<&Violation> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Default)]
struct Collector(Vec<Violation>);

impl Collector {
    fn push(&mut self, key: &'static str, problem: Problem) {
        self.0.push(Violation { key, problem });
    }

    fn required(&mut self, key: &'static str, value: &str) {
        if value.is_empty() {
            self.push(key, Problem::Required);
        }
    }

    fn elements(&mut self, key: &'static str, values: &[String]) {
        for (i, v) in values.iter().enumerate() {
            if v.is_empty() {
                self.push(key, Problem::EmptyElement(i));
            }
        }
    }

    fn url(&mut self, key: &'static str, value: &str) -> Option<Url> {
        if value.is_empty() {
            self.push(key, Problem::Required);
            return None;
        }
        match Url::parse(value) {
            Ok(url) if url.cannot_be_a_base() => {
                self.push(key, Problem::InvalidUrl("cannot be used as a base URL".into()));
                None
            }
            Ok(url) => Some(url),
            Err(e) => {
                self.push(key, Problem::InvalidUrl(e.to_string()));
                None
            }
        }
    }

    fn operation(&mut self, key: &'static str, value: &str) -> Option<Operation> {
        match value.parse() {
            Ok(op) => Some(op),
            Err(_) => {
                self.push(key, Problem::UnknownOperation(value.to_string()));
                None
            }
        }
    }
}

impl Settings {
    /// Checks every rule and either returns the typed configuration or all
    /// violations found.
    pub fn validate(&self) -> Result<Config, ValidationErrors> {
        let mut c = Collector::default();

        c.elements(keys::CANARY_HOSTS, &self.canary_hosts);
        let instance = c.url(keys::INSTANCE, &self.instance);
        c.required(keys::PROJECT, &self.project);
        c.required(keys::JOBSET, &self.jobset);
        c.required(keys::JOB, &self.job);
        let operation = c.operation(keys::OPERATION, &self.operation);
        c.required(keys::HOST, &self.host);
        c.elements(keys::ARGS, &self.args);

        match (instance, operation) {
            (Some(instance), Some(operation)) if c.0.is_empty() => Ok(Config {
                debug: self.debug,
                health_check: HealthCheckConfig {
                    canary_hosts: self.canary_hosts.clone(),
                },
                hydra: HydraConfig {
                    instance,
                    project: self.project.clone(),
                    jobset: self.jobset.clone(),
                    job: self.job.clone(),
                },
                nix_build: NixBuildConfig {
                    operation,
                    host: self.host.clone(),
                    args: self.args.clone(),
                },
                reboot: self.reboot,
            }),
            _ => Err(ValidationErrors(c.0)),
        }
    }
}
