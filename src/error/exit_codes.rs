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

use crate::error::{FailureKind, ProvisionError};

pub fn get_exit_code(error: &ProvisionError) -> i32 {
    exit_code_for_kind(error.kind())
}

pub fn exit_code_for_kind(kind: FailureKind) -> i32 {
    match kind {
        FailureKind::Configuration => 2,
        FailureKind::UnsupportedPlatform => 3,
        FailureKind::ArchiveFormatUnknown | FailureKind::Extraction => 4,
        FailureKind::Filesystem => 13,
        FailureKind::Network | FailureKind::RedirectLoop => 20,
        FailureKind::Locking => 75, // EX_TEMPFAIL
        FailureKind::MissingDependency => 127, // Standard "command not found" exit code
    }
}
