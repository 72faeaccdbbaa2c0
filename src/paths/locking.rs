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

use crate::paths::home;
use crate::paths::shared::sanitize_segment;
use std::path::{Path, PathBuf};

/// Lock file guarding the installation of one family at one version.
pub fn lock_path(cache_root: &Path, family: &str, version: &str) -> PathBuf {
    let family = sanitize_segment(family).unwrap_or_else(|| "default".to_string());
    let version = sanitize_segment(version).unwrap_or_else(|| "default".to_string());
    home::locks_dir(cache_root)
        .join(family)
        .join(format!("{version}.lock"))
}
