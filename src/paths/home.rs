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

use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_DIR_NAME: &str = ".pico-sdk";
pub const TEMP_DIR: &str = "tmp";
pub const LOCKS_DIR: &str = "locks";
pub const CONFIG_FILE: &str = "config.toml";

pub fn cache_root(user_root: &Path, cache_dir_name: &str) -> PathBuf {
    user_root.join(cache_dir_name)
}

pub fn temp_root(cache_root: &Path) -> PathBuf {
    cache_root.join(TEMP_DIR)
}

pub fn locks_dir(cache_root: &Path) -> PathBuf {
    cache_root.join(LOCKS_DIR)
}

pub fn config_file(cache_root: &Path) -> PathBuf {
    cache_root.join(CONFIG_FILE)
}
