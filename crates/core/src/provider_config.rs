// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-provider configuration read from the KV store during reconciliation
//! of hosted-provider backends (OpenAI, Gemini).

use serde::{Deserialize, Serialize};

/// A hosted-provider credential entry, keyed by provider name (`"openai"`,
/// `"gemini"`, …) in the KV table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}
