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

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Receives byte counts while an archive is streamed to disk.
pub trait ProgressReporter: Send {
    fn on_start(&mut self, total_bytes: u64);

    fn on_progress(&mut self, bytes_downloaded: u64);

    fn on_complete(&mut self);
}

/// Terminal progress bar; a spinner when the server sends no length.
pub struct IndicatifProgressReporter {
    context: String,
    progress_bar: Option<ProgressBar>,
}

impl IndicatifProgressReporter {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            progress_bar: None,
        }
    }

    fn create_template(total_bytes: u64) -> &'static str {
        if total_bytes > 0 {
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
             {bytes}/{total_bytes} {msg} ({bytes_per_sec}, {eta})"
        } else {
            "{spinner:.green} [{elapsed_precise}] {bytes} {msg}"
        }
    }
}

impl ProgressReporter for IndicatifProgressReporter {
    fn on_start(&mut self, total_bytes: u64) {
        let pb = if total_bytes > 0 {
            ProgressBar::new(total_bytes)
        } else {
            ProgressBar::new_spinner()
        };

        match ProgressStyle::default_bar().template(Self::create_template(total_bytes)) {
            Ok(style) => pb.set_style(
                style
                    .progress_chars("█▓░")
                    .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"),
            ),
            Err(e) => log::debug!("Invalid progress template: {e}"),
        }

        pb.set_message(format!("Downloading {}", self.context));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(pb);
    }

    fn on_progress(&mut self, bytes_downloaded: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(bytes_downloaded);
        }
    }

    fn on_complete(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for IndicatifProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.abandon();
        }
    }
}

pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn on_start(&mut self, _total_bytes: u64) {}

    fn on_progress(&mut self, _bytes_downloaded: u64) {}

    fn on_complete(&mut self) {}
}

/// Pick a reporter for the current terminal.
///
/// Bars are only drawn when stderr is a terminal and the user did not opt out.
pub fn create_progress_reporter(no_progress: bool, context: &str) -> Box<dyn ProgressReporter> {
    if no_progress || !std::io::stderr().is_terminal() || std::env::var("CI").is_ok() {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(IndicatifProgressReporter::new(context))
    }
}
