// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `Bus` over one `tokio::sync::broadcast` channel per subject.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{Bus, BusError, Subscription};

/// Ring buffer capacity for each subject's broadcast channel. A slow
/// subscriber that falls more than this many messages behind observes a
/// `Lagged` gap, transparently skipped by `Subscription::recv`.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
pub struct InMemoryBus {
    channels: Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, subject: &str) -> broadcast::Sender<Vec<u8>> {
        let mut channels = self.channels.lock();
        channels.entry(subject.to_string()).or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0).clone()
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let sender = self.sender_for(subject);
        // No live subscriber is not an error: at-least-once delivery only
        // promises delivery to whoever is listening when the message lands.
        let _ = sender.send(payload);
        Ok(())
    }

    async fn stream(&self, subject: &str) -> Result<Subscription, BusError> {
        let sender = self.sender_for(subject);
        Ok(Subscription { subject: subject.to_string(), receiver: sender.subscribe() })
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
