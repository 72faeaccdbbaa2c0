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
use crate::paths;
use crate::platform::file_ops;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Private extraction directory inside a family directory.
///
/// Removed on drop unless [`commit`](Self::commit) moved it into place, so a
/// failed install never leaves a half-populated target behind.
#[derive(Debug)]
pub struct StagingDirectory {
    path: PathBuf,
    committed: bool,
}

impl StagingDirectory {
    pub fn create(family_dir: &Path) -> Result<Self> {
        let root = paths::ensure_staging_root(family_dir)?;
        let path = root.join(format!("install-{}", uuid::Uuid::new_v4()));
        fs::create_dir(&path)?;
        debug!("Created staging directory {}", path.display());

        Ok(Self {
            path,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged tree to `target`, which must not exist yet.
    pub fn commit(mut self, target: &Path) -> Result<PathBuf> {
        file_ops::rename_directory(&self.path, target).map_err(|e| {
            ProvisionError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to move {} to {}: {e}",
                    self.path.display(),
                    target.display()
                ),
            ))
        })?;

        self.committed = true;
        debug!("Committed {} to {}", self.path.display(), target.display());
        Ok(target.to_path_buf())
    }
}

impl Drop for StagingDirectory {
    fn drop(&mut self) {
        if !self.committed {
            file_ops::remove_dir_best_effort(&self.path);
        }
    }
}
