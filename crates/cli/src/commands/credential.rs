// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric credential` — set and inspect hosted-provider API keys.
//!
//! Stored under the provider name (`"openai"`, `"gemini"`) in the same KV
//! table the reconciler's probes read during a tick (see
//! `llmfabric_core::ProviderConfig`).

use std::path::Path;

use clap::Subcommand;
use llmfabric_core::ProviderConfig;
use llmfabric_store::Store;

use crate::{store_io, ExitError};

#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Set a hosted provider's API key.
    Set { provider: String, api_key: String },
    /// Remove a hosted provider's API key.
    Rm { provider: String },
    /// List providers with a configured credential (keys are never printed).
    List,
}

pub async fn run(cmd: CredentialCommand, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = store_io::load(snapshot_path).await?;

    match cmd {
        CredentialCommand::Set { provider, api_key } => {
            let config = ProviderConfig::new(api_key);
            let bytes = serde_json::to_vec(&config)?;
            store.set_kv(&provider, bytes).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("set credential for {provider}");
        }
        CredentialCommand::Rm { provider } => {
            store.delete_kv(&provider).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("removed credential for {provider}");
        }
        CredentialCommand::List => {
            let entries = store.list_kv().await.map_err(|e| ExitError::new(1, e.to_string()))?;
            if entries.is_empty() {
                println!("no credentials configured");
            }
            for (provider, _) in entries {
                println!("{provider}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
