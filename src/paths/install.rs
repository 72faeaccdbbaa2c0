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

use crate::error::Result;
use crate::paths::shared::ensure_directory;
use std::path::{Path, PathBuf};

pub const TEMP_STAGING_DIR: &str = ".tmp";
pub const SDK_DIR: &str = "sdk";

pub fn family_dir(cache_root: &Path, family: &str) -> PathBuf {
    cache_root.join(family)
}

pub fn install_dir(cache_root: &Path, family: &str, version: &str) -> PathBuf {
    family_dir(cache_root, family).join(version)
}

/// Install directory rendered with forward slashes, for values persisted in
/// cross-platform configuration.
pub fn install_path_string(cache_root: &Path, family: &str, version: &str) -> String {
    to_forward_slashes(&install_dir(cache_root, family, version))
}

/// SDK checkouts live next to the installed tools but are produced by a
/// git clone rather than an archive.
pub fn sdk_dir(cache_root: &Path, version: &str) -> PathBuf {
    install_dir(cache_root, SDK_DIR, version)
}

/// Staging area on the same filesystem as the family's installations, so a
/// finished staging directory can be renamed into place.
pub fn staging_root(family_dir: &Path) -> PathBuf {
    family_dir.join(TEMP_STAGING_DIR)
}

pub fn ensure_staging_root(family_dir: &Path) -> Result<PathBuf> {
    ensure_directory(staging_root(family_dir))
}

pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
