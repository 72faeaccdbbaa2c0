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

use crate::archive::{ArchiveKind, extract_archive};
use crate::config::ProvisionConfig;
use crate::download::{
    ArchiveFetcher, AttohttpcClient, DownloadOptions, HttpClient, ProgressReporter,
    create_progress_reporter,
};
use crate::error::{ProvisionError, Result};
use crate::host::{ExecutableFinder, GIT_PATH_SETTING, LogNotifier, Notifier, Settings};
use crate::installation::hooks;
use crate::installation::outcome::InstallOutcome;
use crate::installation::staging::StagingDirectory;
use crate::locking::LockController;
use crate::models::{Requirement, ToolFamily, ToolSpec, VersionBundle};
use crate::paths;
use crate::platform::assets::RenderedAsset;
use crate::platform::{HostPlatform, Resolution, resolve};
use crate::release::{AssetQuery, LocateResult, ReleaseLocator};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where the archive for one install comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArchiveSource {
    Release {
        owner: String,
        repo: String,
        tag: String,
        asset_name: String,
    },
    Url(String),
}

impl ArchiveSource {
    /// Name the archive format is derived from.
    fn file_name(&self) -> &str {
        match self {
            ArchiveSource::Release { asset_name, .. } => asset_name,
            ArchiveSource::Url(url) => url,
        }
    }
}

/// Installs tools into the cache tree described by a [`ProvisionConfig`].
///
/// Every entry point returns an [`InstallOutcome`]; errors are logged,
/// reported to the notifier and folded into `InstallOutcome::Failed`.
pub struct Provisioner {
    config: ProvisionConfig,
    download_options: DownloadOptions,
    client: Box<dyn HttpClient>,
    notifier: Box<dyn Notifier>,
    no_progress: bool,
}

impl Provisioner {
    pub fn new(config: ProvisionConfig) -> Self {
        let download_options = DownloadOptions::from(&config.download);
        let client = AttohttpcClient::new()
            .with_timeout(download_options.timeout)
            .with_connect_timeout(download_options.connect_timeout);

        Self {
            config,
            download_options,
            client: Box::new(client),
            notifier: Box::new(LogNotifier),
            no_progress: false,
        }
    }

    pub fn with_client(mut self, client: Box<dyn HttpClient>) -> Self {
        self.client = client;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_no_progress(mut self, no_progress: bool) -> Self {
        self.no_progress = no_progress;
        self
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Install a toolchain from a URL chosen by the caller.
    pub fn install_toolchain(&self, version: &str, url: &str) -> InstallOutcome {
        self.install(ToolFamily::Toolchain, version, Some(url))
    }

    /// Install a toolchain from a table keyed by [`HostPlatform::key`].
    pub fn install_toolchain_from_table(
        &self,
        version: &str,
        urls: &BTreeMap<String, String>,
    ) -> InstallOutcome {
        let url = self
            .config
            .platform()
            .and_then(|platform| urls.get(&platform.key()));

        match url {
            Some(url) => self.install_toolchain(version, url),
            None => self.report(
                ToolFamily::Toolchain,
                version,
                ProvisionError::UnsupportedPlatform {
                    family: ToolFamily::Toolchain.display_name().to_string(),
                    platform: self.platform_label(),
                },
            ),
        }
    }

    /// Install the prebuilt SDK tools. Without `url` the release index is
    /// queried.
    pub fn install_sdk_tools(&self, version: &str, url: Option<&str>) -> InstallOutcome {
        self.install(ToolFamily::Tools, version, url)
    }

    pub fn install_build_tool(&self, version: &str) -> InstallOutcome {
        self.install(ToolFamily::Ninja, version, None)
    }

    pub fn install_debug_bridge(&self, version: &str) -> InstallOutcome {
        self.install(ToolFamily::OpenOcd, version, None)
    }

    pub fn install_build_config_tool(&self, version: &str) -> InstallOutcome {
        self.install(ToolFamily::CMake, version, None)
    }

    /// Install the interpreter named by `bundle`. A download URL carried in
    /// the bundle replaces the built-in one.
    pub fn install_interpreter_runtime(&self, bundle: &VersionBundle) -> InstallOutcome {
        self.install(
            ToolFamily::Python,
            &bundle.python.version,
            bundle.python.windows_amd64.as_deref(),
        )
    }

    pub fn install_version_control(&self) -> InstallOutcome {
        self.install(ToolFamily::Git, &self.config.git.version, None)
    }

    /// Find a usable git: the configured path, then `PATH`, then a download.
    pub fn ensure_version_control(
        &self,
        settings: &mut dyn Settings,
        finder: &dyn ExecutableFinder,
    ) -> InstallOutcome {
        settings.reload();

        if let Some(configured) = settings.get_string(GIT_PATH_SETTING)
            && !configured.trim().is_empty()
        {
            let configured = configured.trim();
            if Path::new(configured).is_file() {
                debug!("Using git from settings: {configured}");
                return InstallOutcome::AlreadyPresent {
                    path: Some(PathBuf::from(configured)),
                };
            }
            if let Some(found) = finder.which(configured) {
                debug!("Resolved configured git {configured} to {}", found.display());
                return InstallOutcome::AlreadyPresent { path: Some(found) };
            }
            warn!("Configured git '{configured}' was not found");
        }

        if let Some(found) = finder.which("git") {
            debug!("Using git from PATH: {}", found.display());
            return InstallOutcome::AlreadyPresent { path: Some(found) };
        }

        match self.install_version_control() {
            InstallOutcome::Skipped { reason } => self.report(
                ToolFamily::Git,
                &self.config.git.version,
                ProvisionError::MissingDependency(format!("git ({reason})")),
            ),
            outcome => outcome,
        }
    }

    /// Shared state machine behind every entry point.
    fn install(&self, family: ToolFamily, version: &str, url: Option<&str>) -> InstallOutcome {
        match self.try_install(family, version, url) {
            Ok(outcome) => outcome,
            Err(e) => self.report(family, version, e),
        }
    }

    fn report(&self, family: ToolFamily, version: &str, error: ProvisionError) -> InstallOutcome {
        let message = format!(
            "Failed to install {} {version}: {error}",
            family.display_name()
        );
        warn!("{message}");
        self.notifier.error(&message);
        InstallOutcome::failed(&error)
    }

    fn platform_label(&self) -> String {
        self.config
            .platform()
            .map(|platform| platform.to_string())
            .unwrap_or_else(|| format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH))
    }

    fn unsupported(&self, family: ToolFamily) -> Result<InstallOutcome> {
        let platform = self.platform_label();
        match family.requirement() {
            Requirement::Optional => {
                info!("{} is not available for {platform}; skipping", family.display_name());
                Ok(InstallOutcome::Skipped {
                    reason: format!("{} is not available for {platform}", family.display_name()),
                })
            }
            Requirement::Required => Err(ProvisionError::UnsupportedPlatform {
                family: family.display_name().to_string(),
                platform,
            }),
        }
    }

    fn try_install(
        &self,
        family: ToolFamily,
        version: &str,
        url: Option<&str>,
    ) -> Result<InstallOutcome> {
        paths::validate_version(version)?;

        let Some(platform) = self.config.platform() else {
            return self.unsupported(family);
        };
        let pattern = match resolve(family, platform.os, platform.arch) {
            Resolution::Supported(pattern) => pattern,
            Resolution::Unsupported(_) => return self.unsupported(family),
        };

        let source = select_source(family, pattern.render(version), url)?;
        let cache_root = self.config.cache_root();
        let tool = ToolSpec::new(&cache_root, family, version, platform);
        let target = tool.install_dir().to_path_buf();

        if target.exists() {
            info!("{tool} is already installed at {}", target.display());
            return Ok(InstallOutcome::AlreadyPresent {
                path: tool.executable_path(),
            });
        }

        let kind = ArchiveKind::from_name(source.file_name())?;
        kind.ensure_extractable_on(platform.os)?;

        let family_dir = paths::ensure_directory(paths::family_dir(&cache_root, family.dir_name()))?;
        let locks = LockController::new(&cache_root, self.config.lock_timeout());
        let _lock = locks.acquire(family.dir_name(), version)?;

        if target.exists() {
            info!("{tool} was installed by another process");
            return Ok(InstallOutcome::AlreadyPresent {
                path: tool.executable_path(),
            });
        }

        let download_url = self.locate(&source)?;
        self.download_and_extract(&tool, platform, &download_url, kind, &family_dir)?;

        info!("Installed {tool} to {}", target.display());
        Ok(InstallOutcome::Installed {
            path: tool.executable_path(),
        })
    }

    fn locate(&self, source: &ArchiveSource) -> Result<String> {
        let locator = ReleaseLocator::new(self.client.as_ref(), &self.config.release_index);
        let query = match source {
            ArchiveSource::Release {
                owner,
                repo,
                tag,
                asset_name,
            } => AssetQuery::Release {
                owner,
                repo,
                tag,
                asset_name,
            },
            ArchiveSource::Url(url) => AssetQuery::Resolved(url),
        };

        match locator.query(query) {
            LocateResult::Located(asset) => Ok(asset.download_url),
            LocateResult::NotFound => match source {
                ArchiveSource::Release {
                    owner,
                    repo,
                    tag,
                    asset_name,
                } => Err(ProvisionError::AssetNotFound {
                    repo: format!("{owner}/{repo}"),
                    tag: tag.clone(),
                    asset: asset_name.clone(),
                }),
                ArchiveSource::Url(url) => Err(ProvisionError::NetworkError(format!(
                    "No asset at {url}"
                ))),
            },
            LocateResult::TransientError(message) => Err(ProvisionError::NetworkError(message)),
        }
    }

    fn download_and_extract(
        &self,
        tool: &ToolSpec,
        platform: HostPlatform,
        url: &str,
        kind: ArchiveKind,
        family_dir: &Path,
    ) -> Result<()> {
        let staging = StagingDirectory::create(family_dir)?;

        let fetcher = ArchiveFetcher::new(self.client.as_ref(), &self.download_options);
        let mut progress = create_progress_reporter(self.no_progress, &tool.to_string());
        let reporter: &mut dyn ProgressReporter = progress.as_mut();
        let archive = fetcher.fetch(url, &self.config.temp_root(), Some(reporter))?;
        debug!(
            "Fetched {} bytes for {tool} from {} after {} redirects",
            archive.bytes, archive.final_url, archive.redirects
        );

        let extracted = extract_archive(
            archive.path(),
            staging.path(),
            kind,
            tool.family().strict_extraction(),
            platform.os,
        );
        drop(archive);
        let report = extracted?;

        if !report.is_complete() {
            warn!(
                "{tool}: {} of {} archive entries could not be extracted",
                report.failed_entries, report.entries
            );
        }

        hooks::post_install(tool, staging.path());
        staging.commit(tool.install_dir())?;
        Ok(())
    }
}

fn select_source(
    family: ToolFamily,
    rendered: RenderedAsset,
    url: Option<&str>,
) -> Result<ArchiveSource> {
    if let Some(url) = url {
        return Ok(ArchiveSource::Url(url.to_string()));
    }

    match rendered {
        RenderedAsset::Release {
            owner,
            repo,
            tag,
            asset_name,
        } => Ok(ArchiveSource::Release {
            owner,
            repo,
            tag,
            asset_name,
        }),
        RenderedAsset::Url(url) => Ok(ArchiveSource::Url(url)),
        RenderedAsset::CallerUrl => Err(ProvisionError::ValidationError(format!(
            "{} requires a download URL",
            family.display_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::host::MapSettings;
    use crate::platform::{HostArch, HostOs};
    use crate::test::fixtures::{
        MockHttpClient, MockResponse, RecordingNotifier, StaticFinder, zip_bytes,
    };
    use std::fs;
    use tempfile::TempDir;

    const LINUX_X64: HostPlatform = HostPlatform::new(HostOs::Linux, HostArch::X64);
    const WINDOWS_X64: HostPlatform = HostPlatform::new(HostOs::Windows, HostArch::X64);

    struct Harness {
        _temp: TempDir,
        client: MockHttpClient,
        notifier: RecordingNotifier,
        provisioner: Provisioner,
    }

    fn harness(platform: HostPlatform, responses: Vec<MockResponse>) -> Harness {
        let temp = TempDir::new().unwrap();
        let mut config = ProvisionConfig::new(temp.path())
            .with_platform(platform)
            .with_release_index_url("https://index.example");
        config.release_index.attempts = 1;
        config.release_index.token = Some("test".to_string());
        config.locking.timeout_secs = 5;

        let client = MockHttpClient::new(responses);
        let notifier = RecordingNotifier::default();
        let provisioner = Provisioner::new(config)
            .with_client(Box::new(client.clone()))
            .with_notifier(Box::new(notifier.clone()))
            .with_no_progress(true);

        Harness {
            _temp: temp,
            client,
            notifier,
            provisioner,
        }
    }

    fn release_json(name: &str, url: &str) -> MockResponse {
        MockResponse::json(&format!(
            r#"{{"tag_name": "v1", "assets": [{{"name": "{name}", "browser_download_url": "{url}", "size": 1}}]}}"#
        ))
    }

    fn is_empty_or_missing(path: &Path) -> bool {
        !path.exists() || fs::read_dir(path).unwrap().next().is_none()
    }

    fn assert_no_leftovers(provisioner: &Provisioner, family: ToolFamily, version: &str) {
        let cache_root = provisioner.config().cache_root();
        let family_dir = paths::family_dir(&cache_root, family.dir_name());
        assert!(!family_dir.join(version).exists());
        assert!(is_empty_or_missing(&paths::staging_root(&family_dir)));
        assert!(is_empty_or_missing(&provisioner.config().temp_root()));
    }

    #[test]
    fn test_build_tool_install_follows_redirect() {
        let h = harness(
            LINUX_X64,
            vec![
                release_json("ninja-linux.zip", "https://dl.example/ninja-linux.zip"),
                MockResponse::redirect(302, "https://objects.example/ninja.zip"),
                MockResponse::ok(zip_bytes(&[("ninja", b"#!/bin/sh\n")])),
            ],
        );

        let outcome = h.provisioner.install_build_tool("1.12.1");

        let cache_root = h.provisioner.config().cache_root();
        let expected = cache_root.join("ninja").join("1.12.1").join("ninja");
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                path: Some(expected.clone())
            }
        );
        assert!(expected.exists());

        let requests = h.client.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0].url,
            "https://index.example/repos/ninja-build/ninja/releases/tags/v1.12.1"
        );
        assert_eq!(requests[1].url, "https://dl.example/ninja-linux.zip");
        assert_eq!(requests[2].url, "https://objects.example/ninja.zip");

        assert!(is_empty_or_missing(&h.provisioner.config().temp_root()));
        assert!(is_empty_or_missing(&cache_root.join("ninja").join(".tmp")));
        assert!(h.notifier.messages().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_build_tool_is_executable_after_install() {
        let h = harness(
            LINUX_X64,
            vec![
                release_json("ninja-linux.zip", "https://dl.example/ninja-linux.zip"),
                MockResponse::ok(zip_bytes(&[("ninja", b"#!/bin/sh\n")])),
            ],
        );

        let outcome = h.provisioner.install_build_tool("1.12.1");
        let executable = outcome.executable().unwrap();
        assert!(crate::platform::file_ops::is_executable(executable).unwrap());
    }

    #[test]
    fn test_existing_install_short_circuits() {
        let h = harness(LINUX_X64, vec![]);
        let target = h
            .provisioner
            .config()
            .cache_root()
            .join("cmake")
            .join("3.31.5");
        fs::create_dir_all(&target).unwrap();

        let first = h.provisioner.install_build_config_tool("3.31.5");
        let second = h.provisioner.install_build_config_tool("3.31.5");

        let expected = InstallOutcome::AlreadyPresent {
            path: Some(target.join("bin").join("cmake")),
        };
        assert_eq!(first, expected);
        assert_eq!(second, expected);
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_concurrent_installs_download_once() {
        let h = harness(
            LINUX_X64,
            vec![
                release_json("ninja-linux.zip", "https://dl.example/ninja-linux.zip"),
                MockResponse::ok(zip_bytes(&[("ninja", b"#!/bin/sh\n")])),
            ],
        );
        let cache_root = h.provisioner.config().cache_root();
        let locks = LockController::new(&cache_root, std::time::Duration::from_secs(5));
        let held = locks.acquire("ninja", "1.12.1").unwrap();

        let outcomes = std::thread::scope(|scope| {
            let first = scope.spawn(|| h.provisioner.install_build_tool("1.12.1"));
            let second = scope.spawn(|| h.provisioner.install_build_tool("1.12.1"));
            std::thread::sleep(std::time::Duration::from_millis(200));
            held.release();
            [first.join().unwrap(), second.join().unwrap()]
        });

        let installed = outcomes
            .iter()
            .filter(|o| matches!(o, InstallOutcome::Installed { .. }))
            .count();
        let present = outcomes
            .iter()
            .filter(|o| matches!(o, InstallOutcome::AlreadyPresent { .. }))
            .count();
        assert_eq!((installed, present), (1, 1));

        let downloads = h
            .client
            .requests()
            .into_iter()
            .filter(|r| r.url == "https://dl.example/ninja-linux.zip")
            .count();
        assert_eq!(downloads, 1);
        assert_eq!(h.client.requests().len(), 2);
        assert!(h.notifier.messages().is_empty());
    }

    #[test]
    fn test_prefixed_bundle_version_resolves_release() {
        let h = harness(
            WINDOWS_X64,
            vec![
                release_json(
                    "cmake-3.31.5-windows-x86_64.zip",
                    "https://dl.example/cmake.zip",
                ),
                MockResponse::ok(zip_bytes(&[
                    ("cmake-3.31.5-windows-x86_64/", b""),
                    ("cmake-3.31.5-windows-x86_64/bin/", b""),
                    ("cmake-3.31.5-windows-x86_64/bin/cmake.exe", b"MZ"),
                ])),
            ],
        );
        let bundle: VersionBundle = serde_json::from_str(
            r#"{"python": {"version": "3.12.6"}, "ninja": "v1.12.1", "cmake": "v3.31.5"}"#,
        )
        .unwrap();

        let outcome = h
            .provisioner
            .install_build_config_tool(bundle.cmake.as_deref().unwrap());

        let install_dir = h
            .provisioner
            .config()
            .cache_root()
            .join("cmake")
            .join("v3.31.5");
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                path: Some(install_dir.join("bin").join("cmake.exe"))
            }
        );
        assert!(install_dir.join("bin").join("cmake.exe").exists());
        assert_eq!(
            h.client.requests()[0].url,
            "https://index.example/repos/Kitware/CMake/releases/tags/v3.31.5"
        );
    }

    #[test]
    fn test_optional_tool_on_unsupported_host_is_skipped() {
        let h = harness(LINUX_X64, vec![]);

        let outcome = h.provisioner.install_debug_bridge("0.12.0+dev");

        assert!(matches!(outcome, InstallOutcome::Skipped { .. }));
        assert!(outcome.is_success());
        assert!(h.client.requests().is_empty());
        assert!(h.notifier.messages().is_empty());
    }

    #[test]
    fn test_required_tool_on_unsupported_host_fails() {
        let h = harness(HostPlatform::new(HostOs::Windows, HostArch::Arm64), vec![]);

        let outcome = h.provisioner.install_sdk_tools("2.0.0", None);

        assert_eq!(
            outcome.failure_kind(),
            Some(FailureKind::UnsupportedPlatform)
        );
        assert!(h.client.requests().is_empty());
        assert_eq!(h.notifier.messages().len(), 1);
    }

    #[test]
    fn test_redirect_limit_comes_from_config() {
        let temp = TempDir::new().unwrap();
        let mut config = ProvisionConfig::new(temp.path()).with_platform(WINDOWS_X64);
        config.download.max_redirects = 1;
        let client = MockHttpClient::new(vec![
            MockResponse::redirect(302, "https://dl.example/a.zip"),
            MockResponse::redirect(302, "https://dl.example/b.zip"),
        ]);
        let provisioner = Provisioner::new(config)
            .with_client(Box::new(client.clone()))
            .with_notifier(Box::new(RecordingNotifier::default()))
            .with_no_progress(true);

        let outcome = provisioner.install_toolchain("14_2_Rel1", "https://dl.example/start.zip");

        assert_eq!(outcome.failure_kind(), Some(FailureKind::RedirectLoop));
        assert_eq!(client.requests().len(), 2);
        assert_no_leftovers(&provisioner, ToolFamily::Toolchain, "14_2_Rel1");
    }

    #[test]
    fn test_download_error_leaves_nothing_behind() {
        let h = harness(
            LINUX_X64,
            vec![
                release_json("ninja-linux.zip", "https://dl.example/ninja-linux.zip"),
                MockResponse::status(404),
            ],
        );

        let outcome = h.provisioner.install_build_tool("1.12.1");

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Network));
        assert_no_leftovers(&h.provisioner, ToolFamily::Ninja, "1.12.1");
        assert_eq!(h.notifier.messages().len(), 1);
    }

    #[test]
    fn test_extraction_failure_leaves_nothing_behind() {
        let h = harness(
            LINUX_X64,
            vec![
                release_json("ninja-linux.zip", "https://dl.example/ninja-linux.zip"),
                MockResponse::ok(b"this is not a zip archive".to_vec()),
            ],
        );

        let outcome = h.provisioner.install_build_tool("1.12.1");

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Extraction));
        assert_no_leftovers(&h.provisioner, ToolFamily::Ninja, "1.12.1");
    }

    #[test]
    fn test_missing_release_asset_fails_without_download() {
        let h = harness(
            LINUX_X64,
            vec![release_json("ninja-win.zip", "https://dl.example/ninja-win.zip")],
        );

        let outcome = h.provisioner.install_build_tool("1.12.1");

        match outcome {
            InstallOutcome::Failed { kind, detail, .. } => {
                assert_eq!(kind, FailureKind::Network);
                assert!(detail.contains("ninja-linux.zip"));
            }
            other => panic!("Expected failure, got {other:?}"),
        }
        assert_eq!(h.client.requests().len(), 1);
    }

    #[test]
    fn test_unknown_archive_format_fails_before_download() {
        let h = harness(LINUX_X64, vec![]);

        let outcome = h
            .provisioner
            .install_toolchain("14_2_Rel1", "https://dl.example/toolchain.rar");

        assert_eq!(
            outcome.failure_kind(),
            Some(FailureKind::ArchiveFormatUnknown)
        );
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_tar_toolchain_on_windows_fails_before_download() {
        let h = harness(WINDOWS_X64, vec![]);

        let outcome = h
            .provisioner
            .install_toolchain("14_2_Rel1", "https://dl.example/toolchain.tar.xz");

        assert_eq!(
            outcome.failure_kind(),
            Some(FailureKind::UnsupportedPlatform)
        );
        assert!(h.client.requests().is_empty());
        assert_no_leftovers(&h.provisioner, ToolFamily::Toolchain, "14_2_Rel1");
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let h = harness(LINUX_X64, vec![]);

        let outcome = h.provisioner.install_build_tool("../1.12.1");

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_staging_directory_name_is_not_a_version() {
        let h = harness(LINUX_X64, vec![]);
        let cache_root = h.provisioner.config().cache_root();
        fs::create_dir_all(cache_root.join("ninja").join(".tmp")).unwrap();

        let outcome = h.provisioner.install_build_tool(".tmp");

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_interpreter_runtime_uses_bundle_url_and_flattens_on_windows() {
        let h = harness(
            WINDOWS_X64,
            vec![MockResponse::ok(zip_bytes(&[
                ("python-3.12.6/", b""),
                ("python-3.12.6/python.exe", b"MZ"),
                ("python-3.12.6/python312.zip", b"PK"),
            ]))],
        );
        let mut bundle = VersionBundle::with_python("3.12.6");
        bundle.python.windows_amd64 = Some("https://mirror.example/python-embed.zip".to_string());

        let outcome = h.provisioner.install_interpreter_runtime(&bundle);

        let install_dir = h
            .provisioner
            .config()
            .cache_root()
            .join("python")
            .join("3.12.6");
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                path: Some(install_dir.join("python.exe"))
            }
        );
        assert!(install_dir.join("python312.zip").exists());
        assert!(!install_dir.join("python-3.12.6").exists());
        assert_eq!(
            h.client.requests()[0].url,
            "https://mirror.example/python-embed.zip"
        );
    }

    #[test]
    fn test_debug_bridge_tolerates_bad_entries() {
        let h = harness(
            WINDOWS_X64,
            vec![
                release_json(
                    "openocd-0.12.0+dev-x64-win.zip",
                    "https://dl.example/openocd.zip",
                ),
                MockResponse::ok(zip_bytes(&[
                    ("openocd.exe", b"MZ"),
                    ("../outside.txt", b"nope"),
                ])),
            ],
        );

        let outcome = h.provisioner.install_debug_bridge("0.12.0+dev");

        assert!(matches!(outcome, InstallOutcome::Installed { .. }));
        assert!(outcome.executable().unwrap().exists());
        assert_eq!(
            h.client.requests()[0].url,
            "https://index.example/repos/raspberrypi/pico-sdk-tools/releases/tags/v0.12.0+dev-0"
        );
    }

    #[test]
    fn test_toolchain_table_without_host_entry_fails() {
        let h = harness(LINUX_X64, vec![]);
        let mut urls = BTreeMap::new();
        urls.insert(
            "win_x64".to_string(),
            "https://dl.example/toolchain-win.zip".to_string(),
        );

        let outcome = h.provisioner.install_toolchain_from_table("14_2_Rel1", &urls);

        assert_eq!(
            outcome.failure_kind(),
            Some(FailureKind::UnsupportedPlatform)
        );
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_toolchain_table_picks_host_entry() {
        let h = harness(
            WINDOWS_X64,
            vec![MockResponse::ok(zip_bytes(&[
                ("arm-none-eabi/", b""),
                ("arm-none-eabi/bin/", b""),
                ("arm-none-eabi/bin/arm-none-eabi-gcc.exe", b"MZ"),
            ]))],
        );
        let mut urls = BTreeMap::new();
        urls.insert(
            "win_x64".to_string(),
            "https://dl.example/toolchain-win.zip".to_string(),
        );

        let outcome = h.provisioner.install_toolchain_from_table("14_2_Rel1", &urls);

        assert_eq!(outcome, InstallOutcome::Installed { path: None });
        let install_dir = h
            .provisioner
            .config()
            .cache_root()
            .join("toolchain")
            .join("14_2_Rel1");
        assert!(install_dir.join("bin").join("arm-none-eabi-gcc.exe").exists());
    }

    #[test]
    fn test_ensure_version_control_prefers_settings() {
        let h = harness(LINUX_X64, vec![]);
        let git = h.provisioner.config().user_root.join("git-bin");
        fs::write(&git, "").unwrap();
        let mut settings = MapSettings::new().with(GIT_PATH_SETTING, git.to_string_lossy());

        let outcome = h
            .provisioner
            .ensure_version_control(&mut settings, &StaticFinder::default());

        assert_eq!(outcome, InstallOutcome::AlreadyPresent { path: Some(git) });
        assert!(h.client.requests().is_empty());
    }

    #[test]
    fn test_ensure_version_control_uses_path_lookup() {
        let h = harness(LINUX_X64, vec![]);
        let finder = StaticFinder::default().with("git", "/usr/bin/git");

        let outcome = h
            .provisioner
            .ensure_version_control(&mut MapSettings::new(), &finder);

        assert_eq!(
            outcome,
            InstallOutcome::AlreadyPresent {
                path: Some(PathBuf::from("/usr/bin/git"))
            }
        );
    }

    #[test]
    fn test_ensure_version_control_reports_missing_git() {
        let h = harness(LINUX_X64, vec![]);

        let outcome = h
            .provisioner
            .ensure_version_control(&mut MapSettings::new(), &StaticFinder::default());

        assert_eq!(
            outcome.failure_kind(),
            Some(FailureKind::MissingDependency)
        );
        assert_eq!(h.notifier.messages().len(), 1);
    }

    #[test]
    fn test_version_control_downloads_fixed_version_on_windows() {
        let h = harness(
            WINDOWS_X64,
            vec![MockResponse::ok(zip_bytes(&[
                ("cmd/", b""),
                ("cmd/git.exe", b"MZ"),
                ("LICENSE.txt", b"GPL"),
            ]))],
        );

        let outcome = h.provisioner.install_version_control();

        assert!(matches!(outcome, InstallOutcome::Installed { .. }));
        assert_eq!(
            h.client.requests()[0].url,
            "https://github.com/git-for-windows/git/releases/download/v2.43.0.windows.1/MinGit-2.43.0-64-bit.zip"
        );
    }
}
