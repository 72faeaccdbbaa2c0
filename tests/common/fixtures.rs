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

//! Archive builders and server fixtures shared by the integration tests.

#![allow(dead_code)]

use provision::config::ProvisionConfig;
use provision::platform::HostPlatform;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: zip::write::FileOptions<'_, ()> = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o755);

    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

pub fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(gz);

    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).unwrap();
        if name.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
        } else {
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
        }
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Release-index payload listing a single asset.
pub fn release_json(tag: &str, name: &str, url: &str) -> String {
    format!(
        r#"{{"tag_name": "{tag}", "assets": [{{"name": "{name}", "browser_download_url": "{url}", "size": 42}}]}}"#
    )
}

/// Configuration rooted at `user_root` that talks to `index_url` and
/// installs for `platform`.
pub fn test_config(user_root: &Path, platform: HostPlatform, index_url: &str) -> ProvisionConfig {
    let mut config = ProvisionConfig::new(user_root)
        .with_platform(platform)
        .with_release_index_url(index_url);
    config.release_index.attempts = 1;
    config.release_index.token = Some("test-token".to_string());
    config.locking.timeout_secs = 10;
    config
}

pub fn is_empty_or_missing(path: &Path) -> bool {
    !path.exists() || fs::read_dir(path).unwrap().next().is_none()
}
