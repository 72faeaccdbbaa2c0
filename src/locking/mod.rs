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

//! Per-installation advisory locks.
//!
//! Every `(family, version)` pair owns a lock file under `<cache>/locks`.
//! Holding it serializes concurrent installers of the same version, in this
//! process or in another one.

pub mod controller;
pub mod handle;

pub use controller::{LockController, PollingBackoff};
pub use handle::InstallLock;
