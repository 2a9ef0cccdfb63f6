//! Update check against the statically hosted version manifest.

use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_VERSION_URL: &str =
    "https://zabiullahjm-star.github.io/price-site/version.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub latest_version: String,
    pub download_url: String,
    #[serde(default)]
    pub change_log: String,
    #[serde(default)]
    pub release_date: String,
}

pub struct UpdateChecker {
    client: reqwest::Client,
    url: String,
}

impl UpdateChecker {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: DEFAULT_VERSION_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns the published version's info when it differs from
    /// `current_version`, `None` when up to date. Failures propagate;
    /// the caller decides whether an update check is worth surfacing.
    pub async fn check(&self, current_version: &str) -> Result<Option<VersionInfo>> {
        let info: VersionInfo = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if info.latest_version == current_version {
            debug!(version = current_version, "already on the latest version");
            Ok(None)
        } else {
            Ok(Some(info))
        }
    }
}

impl Default for UpdateChecker {
    fn default() -> Self {
        Self::new()
    }
}
