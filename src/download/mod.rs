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

//! HTTP transport and archive streaming.

mod client;
mod fetcher;
mod options;
mod progress;

pub use client::{AttohttpcClient, HttpClient, HttpResponse};
pub use fetcher::{ArchiveFetcher, DownloadedArchive, resolve_location};
pub use options::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, DOWNLOAD_CHUNK_SIZE,
    DownloadOptions,
};
pub use progress::{
    IndicatifProgressReporter, ProgressReporter, SilentProgressReporter, create_progress_reporter,
};
