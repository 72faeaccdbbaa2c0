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

use crate::models::ToolFamily;
use crate::paths;
use crate::platform::HostPlatform;
use std::path::{Path, PathBuf};

/// One tool at one version for one host, built per install call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    family: ToolFamily,
    version: String,
    platform: HostPlatform,
    install_dir: PathBuf,
}

impl ToolSpec {
    pub fn new(
        cache_root: &Path,
        family: ToolFamily,
        version: impl Into<String>,
        platform: HostPlatform,
    ) -> Self {
        let version = version.into();
        let install_dir = paths::install_dir(cache_root, family.dir_name(), &version);
        Self {
            family,
            version,
            platform,
            install_dir,
        }
    }

    pub fn family(&self) -> ToolFamily {
        self.family
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Absolute path of the tool's executable once installed, if it exposes one.
    pub fn executable_path(&self) -> Option<PathBuf> {
        self.family
            .executable(self.platform.os)
            .map(|relative| self.install_dir.join(relative))
    }
}

impl std::fmt::Display for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family.display_name(), self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HostArch, HostOs};

    #[test]
    fn test_tool_spec_paths() {
        let spec = ToolSpec::new(
            Path::new("/home/dev/.pico-sdk"),
            ToolFamily::Ninja,
            "1.12.1",
            HostPlatform::new(HostOs::Windows, HostArch::X64),
        );

        assert_eq!(
            spec.install_dir(),
            Path::new("/home/dev/.pico-sdk/ninja/1.12.1")
        );
        assert_eq!(
            spec.executable_path().unwrap(),
            Path::new("/home/dev/.pico-sdk/ninja/1.12.1").join("ninja.exe")
        );
        assert_eq!(spec.to_string(), "Ninja 1.12.1");
    }
}
