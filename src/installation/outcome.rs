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

use crate::error::{ErrorContext, FailureKind, ProvisionError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Result of one install entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Freshly installed. `path` is the tool's executable when it has one.
    Installed { path: Option<PathBuf> },
    /// The target directory already existed; nothing was downloaded.
    AlreadyPresent { path: Option<PathBuf> },
    /// Optional tool with no build for this host.
    Skipped { reason: String },
    /// `suggestion` is the remedy text for the error, when there is one.
    Failed {
        kind: FailureKind,
        detail: String,
        suggestion: Option<String>,
    },
}

impl InstallOutcome {
    pub fn failed(error: &ProvisionError) -> Self {
        InstallOutcome::Failed {
            kind: error.kind(),
            detail: error.to_string(),
            suggestion: ErrorContext::new(error).suggestion,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, InstallOutcome::Failed { .. })
    }

    pub fn executable(&self) -> Option<&Path> {
        match self {
            InstallOutcome::Installed { path } | InstallOutcome::AlreadyPresent { path } => {
                path.as_deref()
            }
            InstallOutcome::Skipped { .. } | InstallOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InstallOutcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Installed { path: Some(path) } => {
                write!(f, "installed ({})", path.display())
            }
            InstallOutcome::Installed { path: None } => f.write_str("installed"),
            InstallOutcome::AlreadyPresent { path: Some(path) } => {
                write!(f, "already installed ({})", path.display())
            }
            InstallOutcome::AlreadyPresent { path: None } => f.write_str("already installed"),
            InstallOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            InstallOutcome::Failed { kind, detail, .. } => write!(f, "failed [{kind}]: {detail}"),
        }
    }
}
