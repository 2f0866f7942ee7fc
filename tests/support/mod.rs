//! Shared helpers for integration tests: SSE fixtures and a mocked platform

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assistant_relay::config::RelayConfig;
use assistant_relay::error::RelayError;
use assistant_relay::stream::ByteStream;
use bytes::Bytes;
use wiremock::MockServer;

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("assistants")
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("read fixture text")
}

/// Split an `.sse` fixture into one chunk per event (blank-line separated).
pub fn fixture_chunks(name: &str) -> Vec<Bytes> {
    let normalized = read_fixture(name).replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(|chunk| chunk.trim_end_matches('\n'))
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| Bytes::from(format!("{chunk}\n\n")))
        .collect()
}

/// Fixture as a [`ByteStream`], delivered one event per chunk.
pub fn fixture_stream(name: &str) -> ByteStream {
    let chunks: Vec<Result<Bytes, RelayError>> =
        fixture_chunks(name).into_iter().map(Ok).collect();
    Box::pin(futures_util::stream::iter(chunks))
}

/// Relay configuration pointing at a mock platform.
pub fn relay_config(server: &MockServer) -> RelayConfig {
    RelayConfig::new("sk-test")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_assistant_id("asst_1")
}
