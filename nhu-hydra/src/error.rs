// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

//! Error types for Hydra API requests.

use thiserror::Error;

/// Result type for Hydra API requests.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a Hydra instance.
#[derive(Error, Debug)]
pub enum Error {
    /// The instance URL cannot have path segments appended (e.g. `mailto:`)
    #[error("Hydra instance '{0}' cannot be used as a base URL")]
    InvalidInstance(String),

    /// The HTTP client could not be constructed
    #[error("Failed to initialise HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport level failure
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Hydra answered with a non-success status
    #[error("Hydra returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body was not the expected JSON document
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
