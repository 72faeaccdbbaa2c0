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
use log::debug;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Remove a single wrapping directory.
///
/// When `dir` contains exactly one entry and that entry is a directory, its
/// children are moved up into `dir` and the wrapper is removed. Returns
/// whether anything was moved. The wrapper is renamed first so a child that
/// shares its name cannot collide with it.
pub fn flatten_single_subfolder(dir: &Path) -> Result<bool> {
    let entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    let [only] = entries.as_slice() else {
        return Ok(false);
    };

    if !only.file_type()?.is_dir() {
        return Ok(false);
    }

    let wrapper = dir.join(format!(".flatten-{}", Uuid::new_v4()));
    fs::rename(only.path(), &wrapper)?;

    for child in fs::read_dir(&wrapper)? {
        let child = child?;
        fs::rename(child.path(), dir.join(child.file_name()))?;
    }

    fs::remove_dir(&wrapper)?;
    debug!(
        "Flattened {} into {}",
        only.file_name().to_string_lossy(),
        dir.display()
    );
    Ok(true)
}
