// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn a_tick_with_no_declared_backends_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    run(StateArgs { mode: CliReconcileMode::Global, format: OutputFormat::Text }, &path).await.unwrap();
}
