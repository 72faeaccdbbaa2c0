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

use log::{debug, warn};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Exclusive lock on one installation target. Released on drop.
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
    file: Option<File>,
    acquired_at: Instant,
}

impl InstallLock {
    pub(crate) fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            file: Some(file),
            acquired_at: Instant::now(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(file) = self.file.take() {
            match file.unlock() {
                Ok(()) => debug!(
                    "Released install lock {} after {:.3}s",
                    self.path.display(),
                    self.acquired_at.elapsed().as_secs_f64()
                ),
                Err(err) => warn!("Failed to unlock {}: {err}", self.path.display()),
            }
        }
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        self.release_inner();
    }
}
