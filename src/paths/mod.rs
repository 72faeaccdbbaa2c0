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

//! Deterministic on-disk layout of the tool cache.
//!
//! ```text
//! <user-root>/<cache-dir-name>/
//!     config.toml
//!     tmp/                          downloaded archives
//!     locks/<family>/<version>.lock
//!     <family>/.tmp/install-<uuid>  staging directories
//!     <family>/<version>/           finished installations
//! ```
//!
//! Nothing here touches the filesystem except the `ensure_*` helpers.

pub mod home;
pub mod install;
pub mod locking;
pub mod shared;

pub use home::{cache_root, config_file, temp_root};
pub use install::{
    ensure_staging_root, family_dir, install_dir, install_path_string, sdk_dir, staging_root,
    to_forward_slashes,
};
pub use locking::lock_path;
pub use shared::{ensure_directory, sanitize_segment, validate_version};
