//! Fake release registry and archive fixtures

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::{Matcher, Mock, Server, ServerGuard};

use setup_task::config::Settings;
use setup_task::version::registries::ReleaseListing;

/// Subset of the go-task/task releases listing, newest first
pub const RELEASES_JSON: &str = r#"[
    {"tag_name": "v3.43.2", "name": "v3.43.2", "prerelease": false},
    {"tag_name": "v3.43.1", "name": "v3.43.1", "prerelease": false},
    {"tag_name": "v3.37.1", "name": "v3.37.1", "prerelease": false},
    {"tag_name": "v3.37.0", "name": "v3.37.0", "prerelease": false},
    {"tag_name": "v3.36.0", "name": "v3.36.0", "prerelease": false},
    {"tag_name": "v3.0.0-preview1", "name": "v3.0.0-preview1", "prerelease": true},
    {"tag_name": "v2.8.1", "name": "v2.8.1", "prerelease": false}
]"#;

/// The same repository seen through the git refs API
#[allow(dead_code)]
pub const TAG_REFS_JSON: &str = r#"[
    {"ref": "refs/tags/v2.8.1"},
    {"ref": "refs/tags/v3.36.0"},
    {"ref": "refs/tags/v3.37.0"},
    {"ref": "refs/tags/latest"}
]"#;

/// Build a gzip-compressed tarball holding executable files with the given names
#[allow(dead_code)]
pub fn tar_gz_with(names: &[&str]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for name in names {
        let contents: &[u8] = b"#!/bin/sh\necho task\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Build a zip archive holding files with the given names
#[allow(dead_code)]
pub fn zip_with(names: &[&str]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for name in names {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"MZ").unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Settings pointing every endpoint at `server_url` and every directory into `root`
#[allow(dead_code)]
pub fn build_settings(server_url: &str, root: &Path, listing: ReleaseListing) -> Settings {
    Settings {
        registry_url: server_url.to_string(),
        download_url: server_url.to_string(),
        listing,
        cache_dir: root.join("tools"),
        temp_dir: root.join("temp"),
        ..Settings::default()
    }
}

/// Mockito server standing in for both the GitHub API and release downloads
pub struct ReleaseServer {
    pub server: ServerGuard,
}

impl ReleaseServer {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Serve `body` from the listing endpoint, expecting `hits` requests
    pub async fn mock_listing(&mut self, endpoint: &str, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/repos/go-task/task/{endpoint}").as_str())
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Serve `archive` as the release asset `filename` of `version`
    #[allow(dead_code)]
    pub async fn mock_archive(
        &mut self,
        version: &str,
        filename: &str,
        archive: Vec<u8>,
        hits: usize,
    ) -> Mock {
        self.server
            .mock(
                "GET",
                format!("/go-task/task/releases/download/{version}/{filename}").as_str(),
            )
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(archive)
            .expect(hits)
            .create_async()
            .await
    }
}
