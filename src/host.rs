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

//! Narrow interfaces to the surrounding environment: stored settings,
//! executable lookup, and user notifications.

use log::{debug, error};
use std::collections::HashMap;
use std::path::PathBuf;

/// Settings key holding a user-chosen git executable.
pub const GIT_PATH_SETTING: &str = "gitPath";

/// Read-only view of user settings.
pub trait Settings {
    fn get_string(&self, key: &str) -> Option<String>;

    /// Refresh cached values from the backing store.
    fn reload(&mut self) {}
}

/// Settings held in memory, typically populated from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    values: HashMap<String, String>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl Settings for MapSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

pub trait ExecutableFinder {
    fn which(&self, name: &str) -> Option<PathBuf>;
}

/// Looks executables up on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFinder;

impl ExecutableFinder for SystemFinder {
    fn which(&self, name: &str) -> Option<PathBuf> {
        match which::which(name) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("{name} not found on PATH: {e}");
                None
            }
        }
    }
}

/// Fire-and-forget channel for user-visible failures.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        error!("{message}");
    }
}
