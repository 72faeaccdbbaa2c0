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
use crate::platform::HostOs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Installable tool families. Each one owns a directory under the cache root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolFamily {
    Toolchain,
    Tools,
    Ninja,
    OpenOcd,
    CMake,
    Python,
    Git,
}

/// Whether an unsupported platform is an error or a silent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

impl ToolFamily {
    pub const ALL: [ToolFamily; 7] = [
        ToolFamily::Toolchain,
        ToolFamily::Tools,
        ToolFamily::Ninja,
        ToolFamily::OpenOcd,
        ToolFamily::CMake,
        ToolFamily::Python,
        ToolFamily::Git,
    ];

    /// Directory name under the cache root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ToolFamily::Toolchain => "toolchain",
            ToolFamily::Tools => "tools",
            ToolFamily::Ninja => "ninja",
            ToolFamily::OpenOcd => "openocd",
            ToolFamily::CMake => "cmake",
            ToolFamily::Python => "python",
            ToolFamily::Git => "git",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ToolFamily::Toolchain => "Toolchain",
            ToolFamily::Tools => "SDK tools",
            ToolFamily::Ninja => "Ninja",
            ToolFamily::OpenOcd => "OpenOCD",
            ToolFamily::CMake => "CMake",
            ToolFamily::Python => "Python",
            ToolFamily::Git => "Git",
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            ToolFamily::OpenOcd | ToolFamily::Python | ToolFamily::Git => Requirement::Optional,
            ToolFamily::Toolchain | ToolFamily::Tools | ToolFamily::Ninja | ToolFamily::CMake => {
                Requirement::Required
            }
        }
    }

    /// Zip archives of the debug bridge carry entries that fail to extract on
    /// some hosts; those failures are tolerated.
    pub fn strict_extraction(&self) -> bool {
        !matches!(self, ToolFamily::OpenOcd)
    }

    /// Executable exposed by an installation, relative to its directory.
    pub fn executable(&self, os: HostOs) -> Option<PathBuf> {
        match self {
            ToolFamily::Toolchain | ToolFamily::Tools => None,
            ToolFamily::Ninja => Some(PathBuf::from(os.with_executable_extension("ninja"))),
            ToolFamily::OpenOcd => Some(PathBuf::from(os.with_executable_extension("openocd"))),
            ToolFamily::CMake => match os {
                HostOs::Macos => Some(["CMake.app", "Contents", "bin", "cmake"].iter().collect()),
                HostOs::Windows | HostOs::Linux => Some(
                    ["bin", &os.with_executable_extension("cmake")]
                        .iter()
                        .collect(),
                ),
            },
            ToolFamily::Python => Some(PathBuf::from(os.with_executable_extension("python"))),
            ToolFamily::Git => Some(
                ["cmd", &os.with_executable_extension("git")]
                    .iter()
                    .collect(),
            ),
        }
    }
}

impl FromStr for ToolFamily {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "toolchain" => Ok(ToolFamily::Toolchain),
            "tools" | "sdk-tools" => Ok(ToolFamily::Tools),
            "ninja" => Ok(ToolFamily::Ninja),
            "openocd" => Ok(ToolFamily::OpenOcd),
            "cmake" => Ok(ToolFamily::CMake),
            "python" => Ok(ToolFamily::Python),
            "git" => Ok(ToolFamily::Git),
            _ => Err(ProvisionError::ValidationError(format!(
                "Unknown tool family: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for ToolFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}
