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

use super::ArchiveKind;
use crate::error::{ProvisionError, Result};
use crate::platform::HostOs;
use log::{debug, warn};
use std::path::Path;
use std::process::Command;

pub const TAR_PROGRAM: &str = "tar";

/// Unpack a tar archive by running the system `tar`.
///
/// The external program is a runtime requirement; it is looked up on PATH
/// and its absence is reported as a missing dependency.
pub fn extract_tar(archive: &Path, destination: &Path, kind: ArchiveKind, os: HostOs) -> Result<()> {
    kind.ensure_extractable_on(os)?;

    let flag = match kind {
        ArchiveKind::TarXz => "-xJf",
        ArchiveKind::TarGz => "-xzf",
        ArchiveKind::Zip => {
            return Err(ProvisionError::ExtractionFailure(format!(
                "{} is not a tar archive",
                archive.display()
            )));
        }
    };

    let tar = which::which(TAR_PROGRAM)
        .map_err(|_| ProvisionError::MissingDependency(TAR_PROGRAM.to_string()))?;

    debug!(
        "Running {} {flag} {} -C {}",
        tar.display(),
        archive.display(),
        destination.display()
    );

    let output = Command::new(&tar)
        .arg(flag)
        .arg(archive)
        .arg("-C")
        .arg(destination)
        .output()
        .map_err(|e| {
            ProvisionError::ExtractionFailure(format!("Failed to run {}: {e}", tar.display()))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("tar exited with {}: {}", output.status, stderr.trim());
        return Err(ProvisionError::ExtractionFailure(format!(
            "tar exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
