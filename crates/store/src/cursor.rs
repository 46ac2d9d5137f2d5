// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque pagination cursor for `List`-style store calls.

use serde::{Deserialize, Serialize};

/// An opaque position in a page-ordered listing.
///
/// `MemoryStore` implements this as an offset into insertion order; a
/// database-backed `Store` would typically encode a primary key instead.
/// Callers must never construct one except by round-tripping a previous
/// `Page::next_cursor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(pub u64);

impl Cursor {
    pub const START: Cursor = Cursor(0);
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` once the listing is exhausted.
    pub next_cursor: Option<Cursor>,
}
