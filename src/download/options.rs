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

use crate::config::DownloadConfig;
use std::time::Duration;

pub use super::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};

/// Redirect hops followed before a download is abandoned.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Size of the buffer used while streaming a response body to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Options for archive downloads. The timeouts configure the HTTP client;
/// the redirect limit is enforced by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Timeout for each socket read
    pub timeout: Duration,

    pub connect_timeout: Duration,

    /// Maximum redirect hops before failing with a redirect loop
    pub max_redirects: u32,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl From<&DownloadConfig> for DownloadOptions {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            max_redirects: config.max_redirects,
        }
    }
}
