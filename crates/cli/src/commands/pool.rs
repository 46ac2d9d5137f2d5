// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric pool` — declare pools and bind backends/models to them.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use llmfabric_core::{Clock, Pool, SystemClock};
use llmfabric_store::Store;

use crate::output::OutputFormat;
use crate::{store_io, ExitError};

#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    /// Declare a new pool.
    Add { name: String, purpose_type: String },
    /// List declared pools.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Remove a declared pool by name.
    Rm { name: String },
    /// Bind a backend to a pool.
    AssignBackend { pool: String, backend: String },
    /// Unbind a backend from a pool.
    UnassignBackend { pool: String, backend: String },
    /// Bind a model to a pool.
    AssignModel { pool: String, model: String },
    /// Unbind a model from a pool.
    UnassignModel { pool: String, model: String },
}

pub async fn run(cmd: PoolCommand, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = store_io::load(snapshot_path).await?;

    match cmd {
        PoolCommand::Add { name, purpose_type } => {
            let pool = Pool::new(name.as_str(), purpose_type.as_str(), SystemClock.epoch_ms());
            store
                .create_pool(pool)
                .await
                .map_err(|e| ExitError::new(1, format!("failed to create pool {name}: {e}")))?;
            store_io::save(&store, snapshot_path).await?;
            println!("created pool {name}");
        }
        PoolCommand::List { format } => {
            let pools = store.list_all_pools().await.context("listing pools")?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pools)?),
                OutputFormat::Text => {
                    if pools.is_empty() {
                        println!("no pools declared");
                    }
                    for pool in &pools {
                        println!("{}\t{}", pool.name, pool.purpose_type);
                    }
                }
            }
        }
        PoolCommand::Rm { name } => {
            let pool = store
                .get_pool_by_name(&name)
                .await
                .map_err(|e| ExitError::new(1, format!("no such pool {name}: {e}")))?;
            store.delete_pool(&pool.id).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("removed pool {name}");
        }
        PoolCommand::AssignBackend { pool, backend } => {
            let pool = lookup_pool(&store, &pool).await?;
            let backend = lookup_backend(&store, &backend).await?;
            store
                .assign_backend_to_pool(&pool.id, &backend.id)
                .await
                .map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("assigned backend {} to pool {}", backend.name, pool.name);
        }
        PoolCommand::UnassignBackend { pool, backend } => {
            let pool = lookup_pool(&store, &pool).await?;
            let backend = lookup_backend(&store, &backend).await?;
            store
                .remove_backend_from_pool(&pool.id, &backend.id)
                .await
                .map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("unassigned backend {} from pool {}", backend.name, pool.name);
        }
        PoolCommand::AssignModel { pool, model } => {
            let pool = lookup_pool(&store, &pool).await?;
            let model = store
                .get_model_by_name(&model)
                .await
                .map_err(|e| ExitError::new(1, format!("no such model: {e}")))?;
            store.assign_model_to_pool(&pool.id, &model.id).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("assigned model {} to pool {}", model.model, pool.name);
        }
        PoolCommand::UnassignModel { pool, model } => {
            let pool = lookup_pool(&store, &pool).await?;
            let model = store
                .get_model_by_name(&model)
                .await
                .map_err(|e| ExitError::new(1, format!("no such model: {e}")))?;
            store.remove_model_from_pool(&pool.id, &model.id).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("unassigned model {} from pool {}", model.model, pool.name);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;

async fn lookup_pool(store: &llmfabric_store::MemoryStore, name: &str) -> anyhow::Result<llmfabric_core::Pool> {
    store.get_pool_by_name(name).await.map_err(|e| ExitError::new(1, format!("no such pool {name}: {e}")).into())
}

async fn lookup_backend(store: &llmfabric_store::MemoryStore, name: &str) -> anyhow::Result<llmfabric_core::Backend> {
    store.get_backend_by_name(name).await.map_err(|e| ExitError::new(1, format!("no such backend {name}: {e}")).into())
}
