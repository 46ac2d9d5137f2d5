// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders for other crates' tests. Gated behind `test-support` so
//! production code never depends on it.

use crate::backend::{Backend, BackendId, BackendType};
use crate::model::{CapabilityFlags, Model, ModelId};

crate::builder! {
    pub struct BackendBuilder => Backend {
        into { name: String = "test-backend" }
        into { base_url: String = "http://localhost:11434" }
        set { backend_type: BackendType = BackendType::Ollama }
        set { created_at_epoch_ms: u64 = 0 }
        set { updated_at_epoch_ms: u64 = 0 }
        computed { id: BackendId = BackendId::new() }
    }
}

crate::builder! {
    pub struct ModelBuilder => Model {
        into { model: String = "llama3" }
        set { capabilities: CapabilityFlags = CapabilityFlags::ALL }
        set { context_length: u32 = 8192 }
        set { created_at_epoch_ms: u64 = 0 }
        set { updated_at_epoch_ms: u64 = 0 }
        computed { id: ModelId = ModelId::new() }
    }
}
