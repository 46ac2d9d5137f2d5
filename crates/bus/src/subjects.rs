// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subject names the core publishes and subscribes to. No other subjects
//! are observable at the core's boundary.

/// Inbound: a `{id}` JSON message cancels an in-flight download whose
/// job URL or model name matches `id`.
pub const QUEUE_CANCEL: &str = "queue_cancel";

/// Outbound: progress events emitted while `downloadModel` runs.
pub const MODEL_DOWNLOAD: &str = "model_download";

/// Inbound: an empty force-tick signal, fanned out by the loop driver to
/// run a reconciliation cycle immediately instead of waiting on its timer.
pub const TRIGGER_CYCLE: &str = "trigger_cycle";
