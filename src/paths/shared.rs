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

use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::PathBuf;

/// Normalise an arbitrary string into a filesystem-safe file name fragment.
///
/// ASCII alphanumerics, `.` and `_` are kept; every other run of characters
/// collapses into a single `-`.
pub fn sanitize_segment(value: &str) -> Option<String> {
    let mut output = String::with_capacity(value.len());
    let mut last_dash = false;

    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
            output.push(ch);
            last_dash = false;
        } else if !last_dash {
            output.push('-');
            last_dash = true;
        }
    }

    let trimmed = output.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Versions become directory names verbatim, so they must be a single
/// relative path segment. Names starting with a dot are reserved for the
/// staging directory.
pub fn validate_version(version: &str) -> Result<()> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(ProvisionError::ValidationError(
            "Version must not be empty".to_string(),
        ));
    }
    if trimmed != version
        || version.starts_with('.')
        || version.contains(['/', '\\', ':'])
    {
        return Err(ProvisionError::ValidationError(format!(
            "Invalid version '{version}': must be a single path segment"
        )));
    }
    Ok(())
}

/// Ensure the provided path exists, returning it on success.
pub fn ensure_directory(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path).map_err(|error| {
        ProvisionError::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to create directory {}: {error}", path.display()),
        ))
    })?;
    Ok(path)
}
