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

mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::{exit_code_for_kind, get_exit_code};
pub use format::{format_error_chain, format_error_with_color, format_failure_with_color};

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Too many redirects while downloading {url} (limit {limit})")]
    RedirectLoop { url: String, limit: u32 },

    #[error("{family} is not available for {platform}")]
    UnsupportedPlatform { family: String, platform: String },

    #[error("Unrecognized archive format: {0}")]
    ArchiveFormatUnknown(String),

    #[error("Failed to extract archive: {0}")]
    ExtractionFailure(String),

    #[error("Required executable '{0}' not found")]
    MissingDependency(String),

    #[error("Asset '{asset}' not found in release {tag} of {repo}")]
    AssetNotFound {
        repo: String,
        tag: String,
        asset: String,
    },

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timed out after {waited_secs:.1}s waiting for install lock {path}")]
    LockTimeout { path: String, waited_secs: f64 },

    #[error("Failed to acquire install lock {path}: {details}")]
    LockAcquire { path: String, details: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Coarse classification of failures, carried by `InstallOutcome::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Network,
    RedirectLoop,
    UnsupportedPlatform,
    ArchiveFormatUnknown,
    Extraction,
    MissingDependency,
    Locking,
    Configuration,
    Filesystem,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::RedirectLoop => "redirect_loop",
            FailureKind::UnsupportedPlatform => "unsupported_platform",
            FailureKind::ArchiveFormatUnknown => "archive_format_unknown",
            FailureKind::Extraction => "extraction",
            FailureKind::MissingDependency => "missing_dependency",
            FailureKind::Locking => "locking",
            FailureKind::Configuration => "configuration",
            FailureKind::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProvisionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProvisionError::NetworkError(_)
            | ProvisionError::AssetNotFound { .. }
            | ProvisionError::Http(_)
            | ProvisionError::Json(_) => FailureKind::Network,
            ProvisionError::RedirectLoop { .. } => FailureKind::RedirectLoop,
            ProvisionError::UnsupportedPlatform { .. } => FailureKind::UnsupportedPlatform,
            ProvisionError::ArchiveFormatUnknown(_) => FailureKind::ArchiveFormatUnknown,
            ProvisionError::ExtractionFailure(_)
            | ProvisionError::SecurityError(_)
            | ProvisionError::Zip(_) => FailureKind::Extraction,
            ProvisionError::MissingDependency(_) => FailureKind::MissingDependency,
            ProvisionError::LockTimeout { .. } | ProvisionError::LockAcquire { .. } => {
                FailureKind::Locking
            }
            ProvisionError::ConfigError(_) | ProvisionError::ValidationError(_) => {
                FailureKind::Configuration
            }
            ProvisionError::Io(_) => FailureKind::Filesystem,
        }
    }
}
