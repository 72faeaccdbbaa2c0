// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lookup of downloadable assets on a hosted release index.
//!
//! The index speaks the GitHub releases API:
//! `GET {base}/repos/{owner}/{repo}/releases/tags/{tag}` returns the release
//! with its asset list, and an asset is picked by exact file name.

use crate::config::ReleaseIndexConfig;
use crate::download::{HttpClient, HttpResponse};
use crate::error::ProvisionError;
use crate::user_agent;
use log::{debug, info, warn};
use retry::{OperationResult, delay::Exponential, retry_with_index};
use serde::Deserialize;

const INITIAL_BACKOFF_MS: u64 = 500;
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
    #[serde(default)]
    size: u64,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub name: String,
    pub download_url: String,
    /// Size reported by the index; 0 when unknown.
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateResult {
    Located(AssetDescriptor),
    /// The tag or the asset does not exist, or the index answered with a
    /// non-success status. Never retried.
    NotFound,
    /// The index could not be reached after every attempt.
    TransientError(String),
}

/// What to look up.
#[derive(Debug, Clone, Copy)]
pub enum AssetQuery<'a> {
    Release {
        owner: &'a str,
        repo: &'a str,
        tag: &'a str,
        asset_name: &'a str,
    },
    /// A URL the caller already resolved; the index is not consulted.
    Resolved(&'a str),
}

pub struct ReleaseLocator<'a> {
    client: &'a dyn HttpClient,
    base_url: String,
    attempts: usize,
    token: Option<String>,
}

impl<'a> ReleaseLocator<'a> {
    pub fn new(client: &'a dyn HttpClient, config: &ReleaseIndexConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            attempts: config.attempts.max(1),
            token: config.resolved_token(),
        }
    }

    pub fn query(&self, query: AssetQuery<'_>) -> LocateResult {
        match query {
            AssetQuery::Resolved(url) => {
                debug!("Using pre-resolved asset URL {url}");
                LocateResult::Located(AssetDescriptor {
                    name: file_name_of(url),
                    download_url: url.to_string(),
                    size: 0,
                })
            }
            AssetQuery::Release {
                owner,
                repo,
                tag,
                asset_name,
            } => self.locate(owner, repo, tag, |name| name == asset_name),
        }
    }

    /// Find the first asset of release `tag` whose name satisfies `predicate`.
    pub fn locate<P>(&self, owner: &str, repo: &str, tag: &str, predicate: P) -> LocateResult
    where
        P: Fn(&str) -> bool,
    {
        let url = format!("{}/repos/{owner}/{repo}/releases/tags/{tag}", self.base_url);

        let response = match self.get_with_retry(&url) {
            Ok(response) => response,
            Err(e) => {
                warn!("Release index unreachable for {owner}/{repo} {tag}: {e}");
                return LocateResult::TransientError(e.to_string());
            }
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            warn!("Release index returned status {status} for {owner}/{repo} {tag}");
            return LocateResult::NotFound;
        }

        let release: Release = match serde_json::from_reader(response) {
            Ok(release) => release,
            Err(e) => {
                warn!("Release index returned an unreadable payload for {owner}/{repo} {tag}: {e}");
                return LocateResult::NotFound;
            }
        };

        debug!(
            "Release {} of {owner}/{repo} lists {} assets",
            release.tag_name.as_deref().unwrap_or(tag),
            release.assets.len()
        );

        match release.assets.into_iter().find(|asset| predicate(&asset.name)) {
            Some(asset) => {
                info!("Found asset {} in {owner}/{repo} {tag}", asset.name);
                LocateResult::Located(AssetDescriptor {
                    name: asset.name,
                    download_url: asset.browser_download_url,
                    size: asset.size,
                })
            }
            None => {
                warn!("No matching asset in {owner}/{repo} {tag}");
                LocateResult::NotFound
            }
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", GITHUB_ACCEPT.to_string()),
            ("User-Agent", user_agent::release_index_client()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn get_with_retry(
        &self,
        url: &str,
    ) -> std::result::Result<Box<dyn HttpResponse>, ProvisionError> {
        let headers = self.headers();

        retry_with_index(
            Exponential::from_millis(INITIAL_BACKOFF_MS).take(self.attempts - 1),
            |current_try| match self.client.get(url, &headers) {
                Ok(response) => OperationResult::Ok(response),
                Err(e) => {
                    debug!("Attempt {current_try} to reach {url} failed: {e}");
                    OperationResult::Retry(e)
                }
            },
        )
        .map_err(|e| e.error)
    }
}

fn file_name_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::{MockHttpClient, MockResponse};

    const RELEASE_JSON: &str = r#"{
        "tag_name": "v1.12.1",
        "assets": [
            {"name": "ninja-linux.zip", "browser_download_url": "https://dl.example/ninja-linux.zip", "size": 120},
            {"name": "ninja-win.zip", "browser_download_url": "https://dl.example/ninja-win.zip", "size": 130}
        ]
    }"#;

    fn config(attempts: usize) -> ReleaseIndexConfig {
        ReleaseIndexConfig {
            base_url: "https://index.example/".to_string(),
            attempts,
            token: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_locate_by_exact_name() {
        let client = MockHttpClient::new(vec![MockResponse::json(RELEASE_JSON)]);
        let config = config(3);
        let locator = ReleaseLocator::new(&client, &config);

        let result = locator.query(AssetQuery::Release {
            owner: "ninja-build",
            repo: "ninja",
            tag: "v1.12.1",
            asset_name: "ninja-win.zip",
        });

        assert_eq!(
            result,
            LocateResult::Located(AssetDescriptor {
                name: "ninja-win.zip".to_string(),
                download_url: "https://dl.example/ninja-win.zip".to_string(),
                size: 130,
            })
        );

        let requests = client.requests();
        assert_eq!(
            requests[0].url,
            "https://index.example/repos/ninja-build/ninja/releases/tags/v1.12.1"
        );
        assert_eq!(requests[0].header("Accept"), Some(GITHUB_ACCEPT));
        assert_eq!(requests[0].header("Authorization"), Some("Bearer secret"));
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let client = MockHttpClient::new(vec![MockResponse::json(RELEASE_JSON)]);
        let config = config(3);
        let locator = ReleaseLocator::new(&client, &config);

        let result = locator.locate("ninja-build", "ninja", "v1.12.1", |name| {
            name == "ninja-mac.zip"
        });
        assert_eq!(result, LocateResult::NotFound);
    }

    #[test]
    fn test_unknown_tag_is_not_found_without_retry() {
        let client = MockHttpClient::new(vec![MockResponse::status(404)]);
        let config = config(3);
        let locator = ReleaseLocator::new(&client, &config);

        let result = locator.locate("ninja-build", "ninja", "v0.0.0", |_| true);
        assert_eq!(result, LocateResult::NotFound);
        assert_eq!(client.requests().len(), 1);
    }

    #[test]
    fn test_unreadable_payload_is_not_found() {
        let client = MockHttpClient::new(vec![MockResponse::json("<html>")]);
        let config = config(1);
        let locator = ReleaseLocator::new(&client, &config);

        assert_eq!(
            locator.locate("o", "r", "t", |_| true),
            LocateResult::NotFound
        );
    }

    #[test]
    fn test_transport_errors_are_retried() {
        // The mock fails with a transport error once its queue is empty.
        let client = MockHttpClient::new(vec![]);
        let config = config(2);
        let locator = ReleaseLocator::new(&client, &config);

        let result = locator.locate("o", "r", "t", |_| true);
        assert!(matches!(result, LocateResult::TransientError(_)));
        assert_eq!(client.requests().len(), 2);
    }

    #[test]
    fn test_resolved_query_skips_index() {
        let client = MockHttpClient::new(vec![]);
        let config = config(3);
        let locator = ReleaseLocator::new(&client, &config);

        let result = locator.query(AssetQuery::Resolved(
            "https://objects.example/path/tool.tar.gz?token=abc",
        ));

        assert_eq!(
            result,
            LocateResult::Located(AssetDescriptor {
                name: "tool.tar.gz".to_string(),
                download_url: "https://objects.example/path/tool.tar.gz?token=abc".to_string(),
                size: 0,
            })
        );
        assert!(client.requests().is_empty());
    }
}
