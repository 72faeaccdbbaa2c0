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

//! Download-and-install orchestration.
//!
//! One install runs: existence check, archive-kind check, lock, second
//! existence check, asset lookup, download, extraction into a staging
//! directory, post-install fix-ups, and a rename into the target directory.

mod hooks;
mod outcome;
mod provisioner;
mod staging;

pub use outcome::InstallOutcome;
pub use provisioner::Provisioner;
pub use staging::StagingDirectory;
