// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit breaker for the daemon's tick loop: after enough
//! consecutive tick failures the loop stops invoking `run_backend_cycle`
//! until a reset timeout has elapsed, instead of hammering a down Store.

use std::time::{Duration, Instant};

use llmfabric_core::{Clock, SystemClock};
use parking_lot::Mutex;

enum State {
    Closed { consecutive_failures: u32 },
    Open { opened_at: Instant },
}

/// Generic over the clock for the same reason as `RuntimeState`: `Clock`
/// requires `Clone` and so isn't object-safe.
pub struct CircuitBreaker<C: Clock = SystemClock> {
    clock: C,
    failure_threshold: u32,
    reset_after: Duration,
    state: Mutex<State>,
}

impl CircuitBreaker<SystemClock> {
    pub fn new(failure_threshold: u32, reset_after: Duration) -> Self {
        Self {
            clock: SystemClock,
            failure_threshold,
            reset_after,
            state: Mutex::new(State::Closed { consecutive_failures: 0 }),
        }
    }
}

impl<C: Clock> CircuitBreaker<C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> CircuitBreaker<C2> {
        CircuitBreaker {
            clock,
            failure_threshold: self.failure_threshold,
            reset_after: self.reset_after,
            state: self.state,
        }
    }

    /// True when the loop should attempt a tick: closed, or open but past
    /// the reset timeout (a half-open trial — the next failure reopens it
    /// immediately, the next success closes it).
    pub fn allow(&self) -> bool {
        let mut state = self.state.lock();
        match &*state {
            State::Closed { .. } => true,
            State::Open { opened_at } => {
                if self.clock.now().duration_since(*opened_at) >= self.reset_after {
                    *state = State::Closed { consecutive_failures: 0 };
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        *self.state.lock() = State::Closed { consecutive_failures: 0 };
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        let failures = match &*state {
            State::Closed { consecutive_failures } => consecutive_failures + 1,
            State::Open { .. } => self.failure_threshold,
        };

        *state = if failures >= self.failure_threshold {
            State::Open { opened_at: self.clock.now() }
        } else {
            State::Closed { consecutive_failures: failures }
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(&*self.state.lock(), State::Open { .. })
    }
}

#[cfg(test)]
#[path = "circuit_tests.rs"]
mod tests;
