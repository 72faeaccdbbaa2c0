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

use super::client::{HttpClient, HttpResponse};
use super::options::{DOWNLOAD_CHUNK_SIZE, DownloadOptions};
use super::progress::ProgressReporter;
use crate::error::{ProvisionError, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use url::Url;

/// An archive streamed to a temporary file.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct DownloadedArchive {
    pub file: NamedTempFile,
    pub final_url: String,
    pub redirects: u32,
    pub bytes: u64,
}

impl DownloadedArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// In-flight state of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DownloadJob {
    source_url: String,
    current_url: String,
    redirect_depth: u32,
}

/// Streams a URL to disk, chasing redirects itself.
pub struct ArchiveFetcher<'a> {
    client: &'a dyn HttpClient,
    options: &'a DownloadOptions,
}

impl<'a> ArchiveFetcher<'a> {
    pub fn new(client: &'a dyn HttpClient, options: &'a DownloadOptions) -> Self {
        Self { client, options }
    }

    /// Download `url` into a new temporary file under `temp_root`.
    ///
    /// Statuses of 400 and above fail. A 301-399 response with a
    /// `Location` header restarts the request against the new target, up to
    /// `max_redirects` times. Anything else is streamed as the body. Nothing
    /// is written to disk until the final response arrives.
    pub fn fetch(
        &self,
        url: &str,
        temp_root: &Path,
        mut progress: Option<&mut dyn ProgressReporter>,
    ) -> Result<DownloadedArchive> {
        let mut job = DownloadJob {
            source_url: url.to_string(),
            current_url: url.to_string(),
            redirect_depth: 0,
        };
        let headers = [("Accept", "*/*".to_string())];

        let response = loop {
            debug!("GET {}", job.current_url);
            let response = self.client.get(&job.current_url, &headers)?;
            let status = response.status();

            if status >= 400 {
                warn!("Download of {} failed with status {status}", job.current_url);
                return Err(ProvisionError::NetworkError(format!(
                    "GET {} returned status {status}",
                    job.current_url
                )));
            }

            if (301..400).contains(&status)
                && let Some(location) = response.header("Location")
            {
                if job.redirect_depth >= self.options.max_redirects {
                    warn!(
                        "Giving up on {} after {} redirects",
                        job.source_url, job.redirect_depth
                    );
                    return Err(ProvisionError::RedirectLoop {
                        url: job.source_url,
                        limit: self.options.max_redirects,
                    });
                }

                let next = resolve_location(&job.current_url, location)?;
                debug!("Status {status}: following redirect to {next}");
                job.current_url = next;
                job.redirect_depth += 1;
                continue;
            }

            break response;
        };

        fs::create_dir_all(temp_root)?;
        let temp_file = tempfile::Builder::new()
            .prefix("download-")
            .suffix(".part")
            .tempfile_in(temp_root)?;

        let total_size = content_length(response.as_ref());
        if let Some(reporter) = progress.as_deref_mut() {
            reporter.on_start(total_size);
        }

        let bytes = stream_to_file(response, &temp_file, progress.as_deref_mut())?;

        if let Some(reporter) = progress.as_deref_mut() {
            reporter.on_complete();
        }

        info!(
            "Downloaded {bytes} bytes from {} ({} redirects)",
            job.current_url, job.redirect_depth
        );

        Ok(DownloadedArchive {
            file: temp_file,
            final_url: job.current_url,
            redirects: job.redirect_depth,
            bytes,
        })
    }
}

/// Resolve a possibly relative `Location` header against the current URL.
pub fn resolve_location(current: &str, location: &str) -> Result<String> {
    let base = Url::parse(current)
        .map_err(|e| ProvisionError::NetworkError(format!("Invalid URL '{current}': {e}")))?;
    let next = base.join(location).map_err(|e| {
        ProvisionError::NetworkError(format!("Invalid redirect target '{location}': {e}"))
    })?;
    Ok(next.to_string())
}

fn content_length(response: &dyn HttpResponse) -> u64 {
    response
        .header("Content-Length")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

fn stream_to_file<'p>(
    mut response: Box<dyn HttpResponse>,
    file: &NamedTempFile,
    mut progress: Option<&mut (dyn ProgressReporter + 'p)>,
) -> Result<u64> {
    let mut writer = BufWriter::new(file.as_file());
    let mut downloaded = 0u64;
    let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

    loop {
        match response.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                writer.write_all(&buffer[..n])?;
                downloaded += n as u64;

                if let Some(reporter) = progress.as_deref_mut() {
                    reporter.on_progress(downloaded);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ProvisionError::NetworkError(format!(
                    "Failed while reading response body: {e}"
                )));
            }
        }
    }

    writer.flush()?;
    Ok(downloaded)
}
