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

//! Per-family download naming tables.
//!
//! Every tool family publishes its archives under its own naming convention.
//! [`resolve`] maps a family and host onto that convention without touching
//! the network; templates are rendered against a concrete version with
//! [`AssetPattern::render`].

use super::{HostArch, HostOs, HostPlatform};
use crate::models::ToolFamily;

const VERSION_PLACEHOLDER: &str = "{version}";

const NINJA_OWNER: &str = "ninja-build";
const NINJA_REPO: &str = "ninja";
const CMAKE_OWNER: &str = "Kitware";
const CMAKE_REPO: &str = "CMake";
const SDK_TOOLS_OWNER: &str = "raspberrypi";
const SDK_TOOLS_REPO: &str = "pico-sdk-tools";

const PYTHON_WINDOWS_URL: &str =
    "https://www.python.org/ftp/python/{version}/python-{version}-embed-amd64.zip";
const GIT_WINDOWS_URL: &str = "https://github.com/git-for-windows/git/releases/download/v{version}.windows.1/MinGit-{version}-64-bit.zip";

/// Release published on a hosted release index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePattern {
    pub owner: &'static str,
    pub repo: &'static str,
    pub tag_template: &'static str,
    pub name_template: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetPattern {
    /// Look the asset up by exact name in a tagged release.
    Release(ReleasePattern),
    /// Download straight from a URL template.
    DirectUrl(&'static str),
    /// The caller supplies the download URL.
    CallerUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Supported(AssetPattern),
    Unsupported(HostPlatform),
}

/// A rendered asset location for one concrete version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedAsset {
    Release {
        owner: String,
        repo: String,
        tag: String,
        asset_name: String,
    },
    Url(String),
    CallerUrl,
}

impl ReleasePattern {
    const fn new(
        owner: &'static str,
        repo: &'static str,
        tag_template: &'static str,
        name_template: &'static str,
    ) -> Self {
        Self {
            owner,
            repo,
            tag_template,
            name_template,
        }
    }

    pub fn tag(&self, version: &str) -> String {
        self.tag_template.replace(VERSION_PLACEHOLDER, version)
    }

    pub fn asset_name(&self, version: &str) -> String {
        self.name_template.replace(VERSION_PLACEHOLDER, version)
    }
}

/// Version number as it appears inside tags and file names.
///
/// Bundle indexes write some versions as `v3.31.5`; one leading `v` is dropped.
pub fn release_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

impl AssetPattern {
    pub fn render(&self, version: &str) -> RenderedAsset {
        let version = release_version(version);
        match self {
            AssetPattern::Release(release) => RenderedAsset::Release {
                owner: release.owner.to_string(),
                repo: release.repo.to_string(),
                tag: release.tag(version),
                asset_name: release.asset_name(version),
            },
            AssetPattern::DirectUrl(template) => {
                RenderedAsset::Url(template.replace(VERSION_PLACEHOLDER, version))
            }
            AssetPattern::CallerUrl => RenderedAsset::CallerUrl,
        }
    }
}

impl Resolution {
    pub fn is_supported(&self) -> bool {
        matches!(self, Resolution::Supported(_))
    }
}

/// Map a tool family and host onto its download naming convention.
///
/// Total over every family, OS and architecture; combinations outside a
/// family's support matrix yield [`Resolution::Unsupported`].
pub fn resolve(family: ToolFamily, os: HostOs, arch: HostArch) -> Resolution {
    let pattern = match family {
        ToolFamily::Toolchain => Some(AssetPattern::CallerUrl),
        ToolFamily::Ninja => ninja_asset(os, arch).map(|name| {
            AssetPattern::Release(ReleasePattern::new(
                NINJA_OWNER,
                NINJA_REPO,
                "v{version}",
                name,
            ))
        }),
        ToolFamily::CMake => cmake_asset(os, arch).map(|name| {
            AssetPattern::Release(ReleasePattern::new(
                CMAKE_OWNER,
                CMAKE_REPO,
                "v{version}",
                name,
            ))
        }),
        ToolFamily::OpenOcd => match (os, arch) {
            (HostOs::Windows, HostArch::X64) => Some(sdk_tools_release("openocd-{version}-x64-win.zip")),
            _ => None,
        },
        ToolFamily::Tools => sdk_tools_asset(os, arch).map(sdk_tools_release),
        ToolFamily::Python => match (os, arch) {
            (HostOs::Windows, HostArch::X64) => Some(AssetPattern::DirectUrl(PYTHON_WINDOWS_URL)),
            _ => None,
        },
        ToolFamily::Git => match (os, arch) {
            (HostOs::Windows, HostArch::X64) => Some(AssetPattern::DirectUrl(GIT_WINDOWS_URL)),
            _ => None,
        },
    };

    match pattern {
        Some(pattern) => Resolution::Supported(pattern),
        None => Resolution::Unsupported(HostPlatform::new(os, arch)),
    }
}

fn sdk_tools_release(name: &'static str) -> AssetPattern {
    AssetPattern::Release(ReleasePattern::new(
        SDK_TOOLS_OWNER,
        SDK_TOOLS_REPO,
        "v{version}-0",
        name,
    ))
}

fn ninja_asset(os: HostOs, arch: HostArch) -> Option<&'static str> {
    Some(match (os, arch) {
        (HostOs::Windows, HostArch::X64) => "ninja-win.zip",
        (HostOs::Windows, HostArch::Arm64) => "ninja-winarm64.zip",
        (HostOs::Macos, _) => "ninja-mac.zip",
        (HostOs::Linux, HostArch::X64) => "ninja-linux.zip",
        (HostOs::Linux, HostArch::Arm64) => "ninja-linux-aarch64.zip",
    })
}

fn cmake_asset(os: HostOs, arch: HostArch) -> Option<&'static str> {
    Some(match (os, arch) {
        (HostOs::Windows, HostArch::X64) => "cmake-{version}-windows-x86_64.zip",
        (HostOs::Windows, HostArch::Arm64) => "cmake-{version}-windows-arm64.zip",
        (HostOs::Macos, _) => "cmake-{version}-macos-universal.tar.gz",
        (HostOs::Linux, HostArch::X64) => "cmake-{version}-linux-x86_64.tar.gz",
        (HostOs::Linux, HostArch::Arm64) => "cmake-{version}-linux-aarch64.tar.gz",
    })
}

fn sdk_tools_asset(os: HostOs, arch: HostArch) -> Option<&'static str> {
    match (os, arch) {
        (HostOs::Windows, HostArch::X64) => Some("pico-sdk-tools-{version}-x64-win.zip"),
        (HostOs::Windows, HostArch::Arm64) => None,
        (HostOs::Macos, _) => Some("pico-sdk-tools-{version}-mac.zip"),
        (HostOs::Linux, HostArch::X64) => Some("pico-sdk-tools-{version}-x86_64-lin.tar.gz"),
        (HostOs::Linux, HostArch::Arm64) => Some("pico-sdk-tools-{version}-aarch64-lin.tar.gz"),
    }
}
