//! Release metadata from the release API.
//!
//! The API follows GitHub's releases endpoints:
//! `GET {base}/releases/latest` and `GET {base}/releases/tags/{tag}`.

use serde::Deserialize;
use std::time::Duration;

use super::error::{UpdateError, UpdateResult};
use super::version::ensure_prefix;

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// File name, e.g. `fp_linux_x86_64.tar.gz`.
    pub name: String,
    /// Direct download URL.
    pub download_url: String,
}

/// A resolved release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    /// Release tag, never empty.
    pub tag: String,
    /// Assets attached to the release.
    pub assets: Vec<Asset>,
}

/// Source of release metadata.
///
/// An empty `version` asks for the latest release.
pub trait ReleaseSource {
    /// Fetch metadata for `version`, or the latest release when empty.
    fn fetch(&self, version: &str) -> UpdateResult<ReleaseMetadata>;
}

#[derive(Debug, Deserialize)]
struct ApiRelease {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    assets: Vec<ApiAsset>,
}

#[derive(Debug, Deserialize)]
struct ApiAsset {
    name: String,
    browser_download_url: String,
}

impl From<ApiAsset> for Asset {
    fn from(asset: ApiAsset) -> Self {
        Self {
            name: asset.name,
            download_url: asset.browser_download_url,
        }
    }
}

/// Fetches release metadata over HTTP.
pub struct ReleaseResolver {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ReleaseResolver {
    /// Create a resolver for `base_url` whose requests time out after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> UpdateResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("footprint/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL queried for `version`.
    pub fn release_url(&self, version: &str) -> String {
        if version.is_empty() {
            format!("{}/releases/latest", self.base_url)
        } else {
            format!("{}/releases/tags/{}", self.base_url, ensure_prefix(version))
        }
    }
}

impl ReleaseSource for ReleaseResolver {
    fn fetch(&self, version: &str) -> UpdateResult<ReleaseMetadata> {
        let url = self.release_url(version);
        tracing::debug!("Fetching release metadata from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::ReleaseNotFound {
                version: if version.is_empty() {
                    "latest".to_string()
                } else {
                    ensure_prefix(version)
                },
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let release: ApiRelease =
            serde_json::from_str(&body).map_err(|e| UpdateError::MalformedRelease {
                message: e.to_string(),
            })?;

        if release.tag_name.is_empty() {
            return Err(UpdateError::MalformedRelease {
                message: "response has no tag_name".to_string(),
            });
        }

        Ok(ReleaseMetadata {
            tag: release.tag_name,
            assets: release.assets.into_iter().map(Asset::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const RELEASE_JSON: &str = r#"{
        "tag_name": "v1.2.0",
        "html_url": "https://github.com/footprint-dev/footprint/releases/tag/v1.2.0",
        "assets": [
            {"name": "fp_linux_x86_64.tar.gz", "browser_download_url": "https://dl.example/linux"},
            {"name": "fp_macos_aarch64.tar.gz", "browser_download_url": "https://dl.example/mac"}
        ]
    }"#;

    fn resolver(server: &MockServer) -> ReleaseResolver {
        ReleaseResolver::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn release_url_shapes() {
        let resolver =
            ReleaseResolver::new("https://api.example/repos/a/b/", Duration::from_secs(1)).unwrap();
        assert_eq!(resolver.base_url(), "https://api.example/repos/a/b");
        assert_eq!(
            resolver.release_url(""),
            "https://api.example/repos/a/b/releases/latest"
        );
        assert_eq!(
            resolver.release_url("1.2.0"),
            "https://api.example/repos/a/b/releases/tags/v1.2.0"
        );
        assert_eq!(
            resolver.release_url("v1.2.0"),
            "https://api.example/repos/a/b/releases/tags/v1.2.0"
        );
    }

    #[test]
    fn fetch_latest_parses_tag_and_assets() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200)
                .header("content-type", "application/json")
                .body(RELEASE_JSON);
        });

        let release = resolver(&server).fetch("").unwrap();

        mock.assert();
        assert_eq!(release.tag, "v1.2.0");
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[0].name, "fp_linux_x86_64.tar.gz");
        assert_eq!(release.assets[0].download_url, "https://dl.example/linux");
    }

    #[test]
    fn fetch_by_tag_adds_prefix() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/releases/tags/v1.2.0");
            then.status(200).body(RELEASE_JSON);
        });

        let release = resolver(&server).fetch("1.2.0").unwrap();

        mock.assert();
        assert_eq!(release.tag, "v1.2.0");
    }

    #[test]
    fn fetch_returns_not_found_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/tags/v9.9.9");
            then.status(404).body(r#"{"message": "Not Found"}"#);
        });

        let err = resolver(&server).fetch("v9.9.9").unwrap_err();

        match err {
            UpdateError::ReleaseNotFound { version, status } => {
                assert_eq!(version, "v9.9.9");
                assert_eq!(status, 404);
            }
            other => panic!("expected ReleaseNotFound, got {:?}", other),
        }
    }

    #[test]
    fn fetch_returns_not_found_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(500).body("boom");
        });

        let err = resolver(&server).fetch("").unwrap_err();
        assert!(matches!(err, UpdateError::ReleaseNotFound { status: 500, .. }));
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn fetch_rejects_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body("<html>rate limited</html>");
        });

        let err = resolver(&server).fetch("").unwrap_err();
        assert!(matches!(err, UpdateError::MalformedRelease { .. }));
    }

    #[test]
    fn fetch_rejects_empty_tag() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(r#"{"tag_name": "", "assets": []}"#);
        });

        let err = resolver(&server).fetch("").unwrap_err();
        assert!(err.to_string().contains("no tag_name"));
    }

    #[test]
    fn fetch_tolerates_missing_assets() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(r#"{"tag_name": "v0.3.0"}"#);
        });

        let release = resolver(&server).fetch("").unwrap();
        assert_eq!(release.tag, "v0.3.0");
        assert!(release.assets.is_empty());
    }

    #[test]
    fn fetch_reports_network_errors() {
        // Nothing listens on port 9 (discard) on test machines.
        let resolver = ReleaseResolver::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = resolver.fetch("").unwrap_err();
        assert!(err.is_network_error());
    }
}
