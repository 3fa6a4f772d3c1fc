use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, UpdateError};
use crate::http::HttpClient;

use super::repo::GitHubRepo;
use super::types::ReleaseRecord;

/// Headers for the metadata fetch: the structured release
/// representation, plus cache bypass so every check observes current
/// registry state.
const RELEASE_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/vnd.github.v3+json"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetch the latest release for a repository. `Ok(None)` means the
    /// repository has published no releases yet (HTTP 404).
    async fn latest_release(
        &self,
        repo: &GitHubRepo,
        cancel: &CancellationToken,
    ) -> Result<Option<ReleaseRecord>>;
}

pub struct GitHubRegistry {
    http: HttpClient,
    api_url: String,
}

impl GitHubRegistry {
    #[tracing::instrument(skip(http, api_url))]
    pub fn new(http: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| "https://api.github.com".to_string());
        Self { http, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl ReleaseRegistry for GitHubRegistry {
    #[tracing::instrument(skip(self, repo, cancel))]
    async fn latest_release(
        &self,
        repo: &GitHubRepo,
        cancel: &CancellationToken,
    ) -> Result<Option<ReleaseRecord>> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        );

        debug!("Fetching latest release from {}...", url);

        let response = self.http.get(&url, RELEASE_HEADERS, cancel).await?;
        let status = response.status();

        // 404 means "no releases published yet", a valid absence
        if status == StatusCode::NOT_FOUND {
            debug!("No releases published for {}", repo);
            return Ok(None);
        }

        if status != StatusCode::OK {
            return Err(UpdateError::InvalidResponse(format!(
                "unexpected HTTP status {} from {}",
                status.as_u16(),
                url
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                UpdateError::InvalidResponse(format!("malformed JSON body: {}", e))
            } else {
                UpdateError::Network(e)
            }
        })?;

        ReleaseRecord::from_json(&payload, status.as_u16()).map(Some)
    }
}
