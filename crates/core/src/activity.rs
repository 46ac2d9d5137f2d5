// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity tracking collaborator: an opaque `Start` call that returns
//! three callbacks for reporting an error, reporting a change, and ending
//! the tracked span. Modeled as a trait object so callers never depend on a
//! concrete tracker — the no-op implementation is always acceptable.

use std::fmt;

/// A single reportable event, opaque to the core.
pub struct TrackedEvent {
    pub operation: String,
    pub subject: String,
    pub entity_id: Option<String>,
}

/// Handle returned by `ActivityTracker::start`.
///
/// `report_error`/`report_change` may be called any number of times before
/// `end`; calling them after `end` is a logic error in the caller, not
/// something this trait needs to guard against.
pub trait ActivitySpan: Send {
    fn report_error(&mut self, error: &dyn fmt::Display);
    fn report_change(&mut self, field: &str, value: &dyn fmt::Display);
    fn end(self: Box<Self>);
}

pub trait ActivityTracker: Send + Sync {
    fn start(&self, operation: &str, subject: &str, kv_args: &[(&str, &str)]) -> Box<dyn ActivitySpan>;
}

/// Always-acceptable default: drops every report on the floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActivityTracker;

struct NoopSpan;

impl ActivitySpan for NoopSpan {
    fn report_error(&mut self, _error: &dyn fmt::Display) {}
    fn report_change(&mut self, _field: &str, _value: &dyn fmt::Display) {}
    fn end(self: Box<Self>) {}
}

impl ActivityTracker for NoopActivityTracker {
    fn start(&self, _operation: &str, _subject: &str, _kv_args: &[(&str, &str)]) -> Box<dyn ActivitySpan> {
        Box::new(NoopSpan)
    }
}

/// Emits a `tracing` span per tracked operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityTracker;

struct TracingSpan {
    span: tracing::Span,
}

impl ActivitySpan for TracingSpan {
    fn report_error(&mut self, error: &dyn fmt::Display) {
        let _enter = self.span.enter();
        tracing::warn!(%error, "activity error");
    }

    fn report_change(&mut self, field: &str, value: &dyn fmt::Display) {
        let _enter = self.span.enter();
        tracing::debug!(field, %value, "activity change");
    }

    fn end(self: Box<Self>) {
        let _enter = self.span.enter();
        tracing::debug!("activity end");
    }
}

impl ActivityTracker for TracingActivityTracker {
    fn start(&self, operation: &str, subject: &str, kv_args: &[(&str, &str)]) -> Box<dyn ActivitySpan> {
        let span = tracing::info_span!("activity", operation = %operation, subject = %subject);
        {
            let _enter = span.enter();
            for (k, v) in kv_args {
                tracing::debug!(key = %k, value = %v, "activity arg");
            }
        }
        Box::new(TracingSpan { span })
    }
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
