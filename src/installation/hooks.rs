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

//! Fix-ups applied to a staged tree before it is moved into place.

use crate::models::{ToolFamily, ToolSpec};
use crate::platform::{HostOs, file_ops};
use log::{debug, info, warn};
use std::path::Path;
use std::process::Command;

/// Run the per-family fix-ups on `staging`. Failures are logged only.
pub fn post_install(tool: &ToolSpec, staging: &Path) {
    let os = tool.platform().os;
    let Some(relative) = tool.family().executable(os) else {
        return;
    };

    let executable = staging.join(&relative);
    if !executable.exists() {
        warn!(
            "{tool} archive did not contain the expected executable {}",
            relative.display()
        );
        return;
    }

    if os.is_posix() {
        match file_ops::make_executable(&executable) {
            Ok(()) => debug!("Marked {} executable", executable.display()),
            Err(e) => warn!("Failed to mark {} executable: {e}", executable.display()),
        }
    }

    if tool.family() == ToolFamily::Git && os == HostOs::Windows {
        remove_system_include(&executable, staging);
    }
}

/// MinGit's system config includes a file at a fixed location outside the
/// install. Drop that section using the freshly extracted binary.
fn remove_system_include(git: &Path, install_root: &Path) {
    let gitconfig = install_root.join("etc").join("gitconfig");
    if !gitconfig.exists() {
        debug!("No {} to patch", gitconfig.display());
        return;
    }

    let output = Command::new(git)
        .arg("config")
        .arg("--file")
        .arg(&gitconfig)
        .args(["--remove-section", "include"])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!("Removed include section from {}", gitconfig.display());
        }
        Ok(output) => warn!(
            "git config exited with {} while patching {}: {}",
            output.status,
            gitconfig.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => warn!("Failed to run {}: {e}", git.display()),
    }
}
