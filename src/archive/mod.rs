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

//! Archive unpacking.
//!
//! Zip archives are read in-process. Tar archives (xz or gzip) are handed to
//! the system `tar` and are only supported on POSIX hosts. After extraction a
//! single wrapping directory is flattened away: always for tar archives, and
//! for zip archives only when installing for Windows.

mod flatten;
mod tarball;
mod zipfile;

pub use flatten::flatten_single_subfolder;
pub use tarball::{TAR_PROGRAM, extract_tar};
pub use zipfile::{extract_zip, validate_entry_path};

use crate::error::{ProvisionError, Result};
use crate::platform::HostOs;
use log::{debug, error, info};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Zip,
    TarXz,
    TarGz,
}

impl ArchiveKind {
    /// Derive the archive kind from a file name or URL.
    ///
    /// Query strings and fragments are ignored, so signed download URLs
    /// still resolve by their path.
    pub fn from_name(name: &str) -> Result<Self> {
        let without_query = name.split(['?', '#']).next().unwrap_or(name);
        let file_name = without_query
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(without_query)
            .to_ascii_lowercase();

        if file_name.ends_with(".zip") {
            Ok(ArchiveKind::Zip)
        } else if file_name.ends_with(".tar.xz") || file_name.ends_with(".txz") {
            Ok(ArchiveKind::TarXz)
        } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            Ok(ArchiveKind::TarGz)
        } else {
            Err(ProvisionError::ArchiveFormatUnknown(name.to_string()))
        }
    }

    pub fn is_tar(&self) -> bool {
        matches!(self, ArchiveKind::TarXz | ArchiveKind::TarGz)
    }

    /// Tar archives are unpacked by the system `tar`, which Windows hosts are
    /// not expected to have.
    pub fn ensure_extractable_on(&self, os: HostOs) -> Result<()> {
        if self.is_tar() && os == HostOs::Windows {
            return Err(ProvisionError::UnsupportedPlatform {
                family: format!("{self} extraction"),
                platform: os.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Whether a lone top-level directory is flattened after extraction.
    pub fn flattens_on(&self, os: HostOs) -> bool {
        self.is_tar() || os == HostOs::Windows
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarXz => "tar.xz",
            ArchiveKind::TarGz => "tar.gz",
        };
        f.write_str(name)
    }
}

/// Outcome of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Entries written; unknown for tar extraction.
    pub entries: usize,
    /// Entries skipped by a lenient zip extraction.
    pub failed_entries: usize,
    pub flattened: bool,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.failed_entries == 0
    }
}

/// Extract `archive` into `target` and apply the flattening rules for
/// `os`.
///
/// `strict` only affects zip archives: strict extraction stops at the first
/// entry that cannot be written, lenient extraction skips it and counts it in
/// the report.
pub fn extract_archive(
    archive: &Path,
    target: &Path,
    kind: ArchiveKind,
    strict: bool,
    os: HostOs,
) -> Result<ExtractionReport> {
    fs::create_dir_all(target)?;
    debug!(
        "Extracting {} archive {} into {}",
        kind,
        archive.display(),
        target.display()
    );

    let mut report = match kind {
        ArchiveKind::Zip => extract_zip(archive, target, strict)?,
        ArchiveKind::TarXz | ArchiveKind::TarGz => {
            extract_tar(archive, target, kind, os)?;
            ExtractionReport::default()
        }
    };

    if kind.flattens_on(os) {
        report.flattened = flatten_single_subfolder(target)?;
    }

    info!(
        "Extracted {} into {} ({} entries, {} failed)",
        archive.display(),
        target.display(),
        report.entries,
        report.failed_entries
    );
    Ok(report)
}

/// Boolean form of [`extract_archive`]: failures are logged, never returned.
pub fn extract(archive: &Path, target: &Path, kind: ArchiveKind, strict: bool, os: HostOs) -> bool {
    match extract_archive(archive, target, kind, strict, os) {
        Ok(_) => true,
        Err(e) => {
            error!("Failed to extract {}: {e}", archive.display());
            false
        }
    }
}
