// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves the shared store snapshot file the CLI reads and writes.
//!
//! Mirrors the daemon's own `LLMFABRIC_SNAPSHOT_PATH` override so a CLI
//! invocation and a running daemon agree on where declared state lives,
//! without the CLI depending on the daemon crate. Falls back to a
//! `LLMFABRIC_STATE_DIR`/XDG state dir default when neither is set.

use std::path::PathBuf;

const STATE_DIR_ENV: &str = "LLMFABRIC_STATE_DIR";
const SNAPSHOT_PATH_ENV: &str = "LLMFABRIC_SNAPSHOT_PATH";

pub fn resolve(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(path) = std::env::var(SNAPSHOT_PATH_ENV) {
        return PathBuf::from(path);
    }
    state_dir().join("store.json")
}

fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("llmfabric");
    }
    dirs_home().join(".local").join("state").join("llmfabric")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
#[path = "state_path_tests.rs"]
mod tests;
