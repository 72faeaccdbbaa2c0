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

pub mod assets;
pub mod file_ops;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use assets::{AssetPattern, ReleasePattern, Resolution, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    #[serde(alias = "win", alias = "win32")]
    Windows,
    #[serde(alias = "darwin", alias = "mac")]
    Macos,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostArch {
    #[serde(alias = "x86_64", alias = "amd64")]
    X64,
    #[serde(alias = "aarch64")]
    Arm64,
}

/// Operating system and CPU architecture the tools are installed for.
///
/// Normally detected from the running binary, but configurable so tests can
/// exercise the Windows and macOS tables from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPlatform {
    pub os: HostOs,
    pub arch: HostArch,
}

impl HostOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Macos => "macos",
            HostOs::Linux => "linux",
        }
    }

    pub fn executable_extension(&self) -> &'static str {
        match self {
            HostOs::Windows => ".exe",
            HostOs::Macos | HostOs::Linux => "",
        }
    }

    pub fn with_executable_extension(&self, name: &str) -> String {
        format!("{}{}", name, self.executable_extension())
    }

    pub fn is_posix(&self) -> bool {
        !matches!(self, HostOs::Windows)
    }
}

impl HostArch {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostArch::X64 => "x64",
            HostArch::Arm64 => "arm64",
        }
    }
}

impl HostPlatform {
    pub const fn new(os: HostOs, arch: HostArch) -> Self {
        Self { os, arch }
    }

    /// Platform of the running binary, `None` outside the supported matrix.
    pub fn detect() -> Option<Self> {
        let os = if cfg!(target_os = "windows") {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Macos
        } else if cfg!(target_os = "linux") {
            HostOs::Linux
        } else {
            return None;
        };

        let arch = if cfg!(target_arch = "x86_64") {
            HostArch::X64
        } else if cfg!(target_arch = "aarch64") {
            HostArch::Arm64
        } else {
            return None;
        };

        Some(Self { os, arch })
    }

    /// Key used by caller-provided download tables (`win_x64`, `darwin_arm64`, ...).
    pub fn key(&self) -> String {
        let os = match self.os {
            HostOs::Windows => "win",
            HostOs::Macos => "darwin",
            HostOs::Linux => "linux",
        };
        format!("{os}_{}", self.arch.as_str())
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
