// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `reqwest::Client` construction for the probes and capability
//! clients in this crate.

use std::time::Duration;

/// Default timeout for listing calls.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build an HTTP client with the given per-request timeout.
///
/// Falls back to `reqwest`'s untimed default client on the (practically
/// unreachable) TLS-backend construction failure, rather than panicking —
/// every call site in this crate is inside a tick, and a tick must never
/// abort on collaborator construction.
pub fn new_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap_or_default()
}
