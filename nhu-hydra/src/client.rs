// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{Build, Eval};

/// Identifies a single job on a Hydra instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCoordinates {
    pub project: String,
    pub jobset: String,
    pub job: String,
}

impl JobCoordinates {
    pub fn new(
        project: impl Into<String>,
        jobset: impl Into<String>,
        job: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            jobset: jobset.into(),
            job: job.into(),
        }
    }
}

/// Client bound to one job on one Hydra instance.
#[derive(Debug, Clone)]
pub struct HydraClient {
    http: reqwest::Client,
    instance: Url,
    coordinates: JobCoordinates,
}

impl HydraClient {
    pub fn new(instance: Url, coordinates: JobCoordinates) -> Result<Self> {
        if instance.cannot_be_a_base() {
            return Err(Error::InvalidInstance(instance.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            http,
            instance,
            coordinates,
        })
    }

    /// Latest build of the configured job.
    pub async fn latest_build(&self) -> Result<Build> {
        let c = &self.coordinates;
        let url = self.endpoint(&["job", &c.project, &c.jobset, &c.job, "latest"])?;
        self.get_json(url).await
    }

    /// Evaluation with the given id.
    pub async fn eval(&self, id: u64) -> Result<Eval> {
        let url = self.endpoint(&["eval", &id.to_string()])?;
        self.get_json(url).await
    }

    /// Appends percent-encoded path segments to the instance URL, tolerating
    /// a trailing slash on the instance.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.instance.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidInstance(self.instance.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request_url = url.to_string();
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| Error::Request {
                url: request_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: request_url,
                status,
            });
        }

        let body = response.text().await.map_err(|source| Error::Request {
            url: request_url.clone(),
            source,
        })?;
        log::debug!(url = request_url.as_str(), body = body.as_str(); "Hydra response");

        serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: request_url,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn client(instance: &str) -> HydraClient {
        HydraClient::new(
            Url::parse(instance).unwrap(),
            JobCoordinates::new("nix-config", "main", "hosts.oak"),
        )
        .unwrap()
    }

    #[rstest]
    #[case("https://hydra.example.com")]
    #[case("https://hydra.example.com/")]
    fn test_latest_build_endpoint(#[case] instance: &str) {
        let c = client(instance);
        let url = c
            .endpoint(&["job", "nix-config", "main", "hosts.oak", "latest"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://hydra.example.com/job/nix-config/main/hosts.oak/latest"
        );
    }

    #[test]
    fn test_endpoint_keeps_instance_prefix() {
        let c = client("https://ci.example.com/hydra/");
        let url = c.endpoint(&["eval", "1234"]).unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/hydra/eval/1234");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let c = client("https://hydra.example.com");
        let url = c.endpoint(&["job", "my project", "a/b", "x", "latest"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://hydra.example.com/job/my%20project/a%2Fb/x/latest"
        );
    }

    #[test]
    fn test_rejects_non_base_instance() {
        let err = HydraClient::new(
            Url::parse("mailto:ops@example.com").unwrap(),
            JobCoordinates::new("p", "js", "j"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }
}
