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

use serde::{Deserialize, Serialize};

/// Versions of the companion tools that ship with one SDK release.
///
/// Matches the JSON shape of an SDK version-bundle index entry, so entries
/// can be deserialized and passed straight to the installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionBundle {
    pub python: PythonRelease,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ninja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openocd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonRelease {
    pub version: String,
    /// Pinned download for Windows x64; overrides the python.org template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_amd64: Option<String>,
}

impl VersionBundle {
    pub fn with_python(version: impl Into<String>) -> Self {
        Self {
            python: PythonRelease {
                version: version.into(),
                windows_amd64: None,
            },
            ninja: None,
            cmake: None,
            openocd: None,
        }
    }
}
