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

use crate::error::{ErrorContext, ProvisionError};
use colored::Colorize;

pub fn format_error_chain(error: &ProvisionError) -> String {
    let context = ErrorContext::new(error);
    context.to_string()
}

pub fn format_error_with_color(error: &ProvisionError, use_color: bool) -> String {
    let context = ErrorContext::new(error);
    format_failure_with_color(
        &error.to_string(),
        context.details.as_deref(),
        context.suggestion.as_deref(),
        use_color,
    )
}

/// Render a failure that is no longer backed by a live error value, such as
/// a failed install outcome.
pub fn format_failure_with_color(
    message: &str,
    details: Option<&str>,
    suggestion: Option<&str>,
    use_color: bool,
) -> String {
    let mut output = String::new();

    let header = if use_color {
        "Error:".red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    output.push_str(&format!("{header} {message}\n"));

    if let Some(details) = details {
        output.push_str(&format!("\n{details}\n"));
    }

    if let Some(suggestion) = suggestion {
        let title = if use_color {
            "Suggestions:".yellow().bold().to_string()
        } else {
            "Suggestions:".to_string()
        };
        output.push_str(&format!("\n{title}\n"));
        for line in suggestion.lines() {
            if !line.trim().is_empty() {
                let bullet = format!("• {line}");
                if use_color {
                    output.push_str(&format!("{}\n", bullet.cyan()));
                } else {
                    output.push_str(&format!("{bullet}\n"));
                }
            }
        }
    }

    output
}
