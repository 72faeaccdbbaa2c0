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

use super::ExtractionReport;
use crate::error::{ProvisionError, Result};
use crate::platform::file_ops;
use ::zip::ZipArchive;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Component, Path};

/// Extract a zip archive entry by entry.
///
/// In strict mode the first failing entry aborts extraction. Otherwise the
/// failure is logged, counted, and extraction continues. An archive that
/// cannot be opened fails in both modes.
pub fn extract_zip(archive_path: &Path, destination: &Path, strict: bool) -> Result<ExtractionReport> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    let total_files = archive.len();
    let mut report = ExtractionReport::default();

    for i in 0..total_files {
        match extract_entry(&mut archive, i, destination) {
            Ok(()) => report.entries += 1,
            Err(e) if strict => {
                warn!("Aborting extraction of {}: {e}", archive_path.display());
                return Err(match e {
                    ProvisionError::SecurityError(_) => e,
                    other => ProvisionError::ExtractionFailure(format!(
                        "entry {i} of {}: {other}",
                        archive_path.display()
                    )),
                });
            }
            Err(e) => {
                warn!("Skipping entry {i} of {}: {e}", archive_path.display());
                report.failed_entries += 1;
            }
        }

        if (i + 1) % 100 == 0 {
            debug!("Extracted {}/{} files...", i + 1, total_files);
        }
    }

    Ok(report)
}

fn extract_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    destination: &Path,
) -> Result<()> {
    let mut file = archive.by_index(index)?;
    let raw_name = file.name().to_string();
    validate_entry_path(Path::new(&raw_name))?;
    let outpath = match file.enclosed_name() {
        Some(path) => destination.join(path),
        None => {
            return Err(ProvisionError::SecurityError(format!(
                "Archive entry would extract outside destination: {raw_name}"
            )));
        }
    };

    if file.is_dir() {
        fs::create_dir_all(&outpath)?;
        return Ok(());
    }

    if let Some(parent) = outpath.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut outfile = File::create(&outpath)?;
    std::io::copy(&mut file, &mut outfile)?;

    if let Some(mode) = file.unix_mode() {
        file_ops::set_permissions_from_mode(&outpath, mode)?;
    }

    Ok(())
}

/// Reject entry names that climb out of, or ignore, the destination.
pub fn validate_entry_path(entry_path: &Path) -> Result<()> {
    let as_text = entry_path.to_string_lossy();
    if as_text.starts_with('/') || as_text.starts_with('\\') {
        return Err(ProvisionError::SecurityError(format!(
            "Archive contains absolute path: {entry_path:?}"
        )));
    }

    for component in entry_path.components() {
        match component {
            Component::ParentDir => {
                return Err(ProvisionError::SecurityError(format!(
                    "Archive contains path traversal: {entry_path:?}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ProvisionError::SecurityError(format!(
                    "Archive contains absolute path: {entry_path:?}"
                )));
            }
            _ => {}
        }
    }

    if as_text.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(ProvisionError::SecurityError(format!(
            "Archive contains path traversal: {entry_path:?}"
        )));
    }

    Ok(())
}
