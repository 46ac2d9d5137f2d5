// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! llmfabric-bus: the `Bus` trait — at-least-once publish plus
//! subject-based streaming subscription — and an in-memory implementation
//! over `tokio::sync::broadcast`.
//!
//! The reconciler and download queue never see a transport; they publish
//! and subscribe by subject name and decode whatever JSON a subscriber on
//! that subject expects. See [`subjects`] and [`messages`] for the three
//! subjects the core speaks.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod memory;
pub mod messages;
pub mod subjects;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryBus;
pub use messages::{ModelDownloadProgress, QueueCancelMessage};

/// Errors from a `Bus` operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("publish failed: {0}")]
    PublishFailure(String),
    #[error("subscription closed")]
    SubjectClosed,
}

/// A live subscription to a subject. Dropping it unsubscribes.
pub struct Subscription {
    subject: String,
    receiver: tokio::sync::broadcast::Receiver<Vec<u8>>,
}

impl Subscription {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Await the next message, or `Err(SubjectClosed)` once every publisher
    /// has dropped and no message remains buffered.
    ///
    /// A subscriber that falls behind the broadcast channel's capacity sees
    /// `Lagged` messages skipped transparently rather than surfaced as an
    /// error; the core only needs "eventually delivered," not exactly-once.
    pub async fn recv(&mut self) -> Result<Vec<u8>, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Ok(payload),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return Err(BusError::SubjectClosed),
            }
        }
    }
}

/// Pub/sub collaborator used for cancellation signals and download progress.
///
/// Implementations need only best-effort, at-least-once delivery: the core
/// never relies on exactly-once semantics, and a publish with no live
/// subscribers is not an error.
#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError>;
    async fn stream(&self, subject: &str) -> Result<Subscription, BusError>;
}
