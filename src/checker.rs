//! High-level entry point tying the release registry and the update
//! resolver together.

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::http::HttpClient;
use crate::platform::Platform;
use crate::registry::{GitHubRegistry, GitHubRepo, ReleaseRegistry};
use crate::resolve::{resolve_update, AppUpdate};

/// Checks a single repository for application updates.
pub struct UpdateChecker<R: ReleaseRegistry> {
    registry: R,
    repo: GitHubRepo,
    platform: Platform,
}

impl UpdateChecker<GitHubRegistry> {
    /// Checker against the GitHub releases API, targeting the platform
    /// this binary was built for. `api_url` overrides the API base,
    /// mainly for tests.
    pub fn new(http: HttpClient, repo: GitHubRepo, api_url: Option<String>) -> Self {
        Self {
            registry: GitHubRegistry::new(http, api_url),
            repo,
            platform: Platform::detect(),
        }
    }
}

impl<R: ReleaseRegistry> UpdateChecker<R> {
    pub fn with_registry(registry: R, repo: GitHubRepo) -> Self {
        Self {
            registry,
            repo,
            platform: Platform::detect(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// `Ok(None)` when the repository has no releases, or its latest
    /// release is not an upgrade over `current_version`.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn check_for_updates(
        &self,
        current_version: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AppUpdate>> {
        info!("Checking {} for updates...", self.repo);

        let Some(release) = self.registry.latest_release(&self.repo, cancel).await? else {
            debug!("{} has no published releases", self.repo);
            return Ok(None);
        };

        resolve_update(&release, current_version, &self.platform)
    }
}
