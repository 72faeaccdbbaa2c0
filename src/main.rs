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

use clap::{Parser, Subcommand};
use colored::Colorize;
use provision::config::new_provision_config;
use provision::error::{
    exit_code_for_kind, format_error_with_color, format_failure_with_color, get_exit_code,
};
use provision::host::{GIT_PATH_SETTING, MapSettings, SystemFinder};
use provision::installation::{InstallOutcome, Provisioner};
use provision::logging;
use provision::models::{ToolFamily, VersionBundle};
use provision::paths;
use std::io::IsTerminal;
use std::path::Path;

#[derive(Parser)]
#[command(name = "provision")]
#[command(author, version, about = "Embedded toolchain provisioning", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable progress indicators
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a compiler toolchain from a download URL
    Toolchain {
        version: String,
        url: String,
    },

    /// Install the prebuilt SDK tools
    Tools {
        version: String,
        /// Download from this URL instead of the release index
        #[arg(long)]
        url: Option<String>,
    },

    /// Install Ninja
    Ninja { version: String },

    /// Install CMake
    Cmake { version: String },

    /// Install OpenOCD (Windows only)
    Openocd { version: String },

    /// Install the embeddable Python runtime (Windows x64 only)
    Python {
        version: String,
        /// Download from this URL instead of python.org
        #[arg(long)]
        url: Option<String>,
    },

    /// Locate git, downloading MinGit on Windows when it is missing
    Git {
        /// Git executable to prefer over PATH
        #[arg(long, value_name = "PATH")]
        git_path: Option<String>,
    },

    /// Print the install directory of a tool version
    Path {
        /// Tool family (toolchain, tools, ninja, cmake, openocd, python, git)
        family: String,
        version: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logger(cli.verbose);

    let use_color = std::io::stderr().is_terminal();

    let config = match new_provision_config() {
        Ok(config) => config,
        Err(e) => {
            eprint!("{}", format_error_with_color(&e, use_color));
            std::process::exit(get_exit_code(&e));
        }
    };

    let provisioner = Provisioner::new(config).with_no_progress(cli.no_progress);

    let (label, outcome) = match cli.command {
        Commands::Toolchain { version, url } => (
            format!("Toolchain {version}"),
            provisioner.install_toolchain(&version, &url),
        ),
        Commands::Tools { version, url } => (
            format!("SDK tools {version}"),
            provisioner.install_sdk_tools(&version, url.as_deref()),
        ),
        Commands::Ninja { version } => (
            format!("Ninja {version}"),
            provisioner.install_build_tool(&version),
        ),
        Commands::Cmake { version } => (
            format!("CMake {version}"),
            provisioner.install_build_config_tool(&version),
        ),
        Commands::Openocd { version } => (
            format!("OpenOCD {version}"),
            provisioner.install_debug_bridge(&version),
        ),
        Commands::Python { version, url } => {
            let mut bundle = VersionBundle::with_python(version.clone());
            bundle.python.windows_amd64 = url;
            (
                format!("Python {version}"),
                provisioner.install_interpreter_runtime(&bundle),
            )
        }
        Commands::Git { git_path } => {
            let mut settings = MapSettings::new();
            if let Some(path) = git_path {
                settings = settings.with(GIT_PATH_SETTING, path);
            }
            (
                "Git".to_string(),
                provisioner.ensure_version_control(&mut settings, &SystemFinder),
            )
        }
        Commands::Path { family, version } => {
            let cache_root = provisioner.config().cache_root();
            std::process::exit(print_path(&cache_root, &family, &version, use_color))
        }
    };

    std::process::exit(print_outcome(&label, &outcome, use_color));
}

fn print_path(cache_root: &Path, family: &str, version: &str, use_color: bool) -> i32 {
    let path = family.parse::<ToolFamily>().and_then(|family| {
        paths::validate_version(version)?;
        Ok(paths::install_path_string(cache_root, family.dir_name(), version))
    });

    match path {
        Ok(path) => {
            println!("{path}");
            0
        }
        Err(e) => {
            eprint!("{}", format_error_with_color(&e, use_color));
            get_exit_code(&e)
        }
    }
}

fn print_outcome(label: &str, outcome: &InstallOutcome, use_color: bool) -> i32 {
    match outcome {
        InstallOutcome::Installed { .. } | InstallOutcome::AlreadyPresent { .. } => {
            let status = if matches!(outcome, InstallOutcome::Installed { .. }) {
                "Installed"
            } else {
                "Already installed"
            };
            let status = if use_color {
                status.green().bold().to_string()
            } else {
                status.to_string()
            };
            match outcome.executable() {
                Some(path) => println!("{status} {label}: {}", paths::to_forward_slashes(path)),
                None => println!("{status} {label}"),
            }
            0
        }
        InstallOutcome::Skipped { reason } => {
            let status = if use_color {
                "Skipped".yellow().bold().to_string()
            } else {
                "Skipped".to_string()
            };
            println!("{status} {label}: {reason}");
            0
        }
        InstallOutcome::Failed {
            kind,
            detail,
            suggestion,
        } => {
            eprint!(
                "{}",
                format_failure_with_color(detail, None, suggestion.as_deref(), use_color)
            );
            exit_code_for_kind(*kind)
        }
    }
}
