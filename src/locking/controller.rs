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
use crate::locking::handle::InstallLock;
use crate::paths;
use log::debug;
use std::cmp;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Exponential backoff used while polling a contended lock.
#[derive(Debug, Clone)]
pub struct PollingBackoff {
    factor: u32,
    cap: Duration,
    current: Duration,
}

impl PollingBackoff {
    pub fn new(initial: Duration, factor: u32, cap: Duration) -> Self {
        Self {
            factor: cmp::max(factor, 1),
            cap,
            current: initial,
        }
    }

    /// Returns the current delay and advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = cmp::min(self.current.saturating_mul(self.factor), self.cap);
        delay
    }
}

impl Default for PollingBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(10), 2, Duration::from_millis(500))
    }
}

pub struct LockController {
    cache_root: PathBuf,
    timeout: Duration,
}

impl LockController {
    pub fn new(cache_root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            cache_root: cache_root.into(),
            timeout,
        }
    }

    pub fn lock_path(&self, family: &str, version: &str) -> PathBuf {
        paths::lock_path(&self.cache_root, family, version)
    }

    /// Block until the lock for `(family, version)` is held or the timeout
    /// elapses.
    pub fn acquire(&self, family: &str, version: &str) -> Result<InstallLock> {
        let lock_path = self.lock_path(family, version);
        let file = open_lock_file(&lock_path)?;

        let started = Instant::now();
        let mut backoff = PollingBackoff::default();

        loop {
            match file.try_lock() {
                Ok(()) => {
                    debug!(
                        "Acquired install lock {} after {:.3}s",
                        lock_path.display(),
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(InstallLock::new(lock_path, file));
                }
                Err(TryLockError::WouldBlock) => {
                    let waited = started.elapsed();
                    if waited >= self.timeout {
                        return Err(ProvisionError::LockTimeout {
                            path: lock_path.display().to_string(),
                            waited_secs: waited.as_secs_f64(),
                        });
                    }
                    let remaining = self.timeout - waited;
                    thread::sleep(cmp::min(backoff.next_delay(), remaining));
                }
                Err(TryLockError::Error(err)) if err.kind() == io::ErrorKind::Interrupted => {
                    continue;
                }
                Err(TryLockError::Error(err)) => {
                    return Err(ProvisionError::LockAcquire {
                        path: lock_path.display().to_string(),
                        details: err.to_string(),
                    });
                }
            }
        }
    }

    /// Take the lock only if nobody holds it.
    pub fn try_acquire(&self, family: &str, version: &str) -> Result<Option<InstallLock>> {
        let lock_path = self.lock_path(family, version);
        let file = open_lock_file(&lock_path)?;

        match file.try_lock() {
            Ok(()) => Ok(Some(InstallLock::new(lock_path, file))),
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Error(err)) => Err(ProvisionError::LockAcquire {
                path: lock_path.display().to_string(),
                details: err.to_string(),
            }),
        }
    }
}

fn open_lock_file(lock_path: &Path) -> Result<File> {
    let open = || -> io::Result<File> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
    };

    open().map_err(|err| ProvisionError::LockAcquire {
        path: lock_path.display().to_string(),
        details: format!("Failed to open lock file: {err}"),
    })
}
