// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! llmfabric-engine: the reconciliation tick (`RuntimeState`), the model
//! download queue, the capability resolver, the leased-job reaper, and the
//! loop driver's circuit breaker.
//!
//! This crate owns the one piece of core shared mutable state (the
//! backend-id-keyed snapshot map) and the two tick methods that mutate it;
//! everything else here is either read-only projection or a thin wrapper
//! over the Store/Bus.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod circuit;
pub mod download;
pub mod reaper;
pub mod resolver;
pub mod runtime;

pub use circuit::CircuitBreaker;
pub use download::DownloadQueue;
pub use reaper::run_reaper_once;
pub use resolver::{ResolveRequest, Resolver, SelectionPolicy};
pub use runtime::{ReconcileMode, RuntimeState};
