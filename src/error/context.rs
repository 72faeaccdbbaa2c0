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

use crate::error::ProvisionError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a ProvisionError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a ProvisionError) -> Self {
        let (suggestion, details) = match error {
            ProvisionError::NetworkError(msg) => {
                let suggestion = Some(
                    "Check your internet connection and proxy settings (HTTPS_PROXY) and try \
                     again."
                        .to_string(),
                );
                let details = Some(format!("Network issue: {msg}"));
                (suggestion, details)
            }
            ProvisionError::RedirectLoop { limit, .. } => {
                let suggestion = Some(format!(
                    "The download server kept redirecting. Raise PROVISION_DOWNLOAD__MAX_REDIRECTS \
                     (currently {limit}) or try again later."
                ));
                (suggestion, None)
            }
            ProvisionError::UnsupportedPlatform { family, .. } => {
                let suggestion = Some(format!(
                    "Install {family} with your system package manager and make sure it is on \
                     PATH."
                ));
                (suggestion, None)
            }
            ProvisionError::ArchiveFormatUnknown(name) => {
                let suggestion = Some(
                    "Only .zip, .tar.xz and .tar.gz downloads can be installed. Check the \
                     download URL."
                        .to_string(),
                );
                let details = Some(format!("Could not derive an archive type from '{name}'"));
                (suggestion, details)
            }
            ProvisionError::ExtractionFailure(msg) => {
                let suggestion =
                    Some("Ensure you have enough disk space and try again.".to_string());
                let details = Some(format!("Extraction failed: {msg}"));
                (suggestion, details)
            }
            ProvisionError::MissingDependency(name) => {
                let suggestion = Some(format!(
                    "Ensure '{name}' is installed and available in your PATH."
                ));
                (suggestion, None)
            }
            ProvisionError::AssetNotFound { repo, tag, .. } => {
                let suggestion = Some(format!(
                    "Check that release '{tag}' of {repo} exists and ships a build for this \
                     platform."
                ));
                (suggestion, None)
            }
            ProvisionError::LockTimeout { .. } => {
                let suggestion = Some(
                    "Another process is installing the same tool. Wait for it to finish or \
                     raise PROVISION_LOCKING__TIMEOUT_SECS."
                        .to_string(),
                );
                (suggestion, None)
            }
            ProvisionError::ConfigError(msg) => {
                let suggestion = Some(
                    "Fix the config.toml in the cache root or the PROVISION_* environment \
                     variables."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            ProvisionError::Http(http_err) => {
                let error_string = http_err.to_string();
                let suggestion = if error_string.contains("timeout")
                    || error_string.contains("Timeout")
                {
                    Some(
                        "Try increasing PROVISION_DOWNLOAD__TIMEOUT_SECS (e.g. 600).".to_string(),
                    )
                } else {
                    Some("Check your internet connection and try again.".to_string())
                };
                let details = Some(format!("HTTP error: {http_err}"));
                (suggestion, details)
            }
            ProvisionError::Io(io_err) => {
                let suggestion = match io_err.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        if cfg!(unix) {
                            Some("Check the permissions of the cache directory.".to_string())
                        } else {
                            Some("Run as Administrator or check file permissions.".to_string())
                        }
                    }
                    std::io::ErrorKind::NotFound => Some(
                        "Ensure the file or directory exists and the path is correct.".to_string(),
                    ),
                    _ => None,
                };
                let details = Some(format!("I/O error: {io_err}"));
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
