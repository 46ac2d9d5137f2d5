// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric backend` — declare and inspect backends.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use llmfabric_core::{Backend, BackendType, Clock, SystemClock};
use llmfabric_store::Store;

use crate::output::{format_time_ago, OutputFormat};
use crate::{store_io, ExitError};

#[derive(Subcommand, Debug)]
pub enum BackendCommand {
    /// Declare a new backend.
    Add {
        name: String,
        base_url: String,
        #[arg(value_enum)]
        backend_type: CliBackendType,
    },
    /// List declared backends.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Remove a declared backend by name.
    Rm { name: String },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CliBackendType {
    Ollama,
    Vllm,
    Openai,
    Gemini,
}

impl From<CliBackendType> for BackendType {
    fn from(value: CliBackendType) -> Self {
        match value {
            CliBackendType::Ollama => BackendType::Ollama,
            CliBackendType::Vllm => BackendType::Vllm,
            CliBackendType::Openai => BackendType::Openai,
            CliBackendType::Gemini => BackendType::Gemini,
        }
    }
}

pub async fn run(cmd: BackendCommand, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = store_io::load(snapshot_path).await?;

    match cmd {
        BackendCommand::Add { name, base_url, backend_type } => {
            let backend = Backend::new(name.as_str(), base_url.as_str(), backend_type.into(), SystemClock.epoch_ms());
            store
                .create_backend(backend)
                .await
                .map_err(|e| ExitError::new(1, format!("failed to create backend {name}: {e}")))?;
            store_io::save(&store, snapshot_path).await?;
            println!("created backend {name}");
        }
        BackendCommand::List { format } => {
            let backends = store.list_all_backends().await.context("listing backends")?;
            print_backends(&backends, format)?;
        }
        BackendCommand::Rm { name } => {
            let backend = store
                .get_backend_by_name(&name)
                .await
                .map_err(|e| ExitError::new(1, format!("no such backend {name}: {e}")))?;
            store.delete_backend(&backend.id).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("removed backend {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

fn print_backends(backends: &[Backend], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(backends)?),
        OutputFormat::Text => {
            if backends.is_empty() {
                println!("no backends declared");
                return Ok(());
            }
            let now_ms = SystemClock.epoch_ms();
            for backend in backends {
                println!(
                    "{}\t{}\t{}\tcreated {}",
                    backend.name,
                    backend.backend_type,
                    backend.base_url,
                    format_time_ago(backend.created_at_epoch_ms, now_ms),
                );
            }
        }
    }
    Ok(())
}
