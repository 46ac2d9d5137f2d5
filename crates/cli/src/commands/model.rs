// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric model` — declare and inspect models.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use llmfabric_core::{CapabilityFlags, Clock, Model, SystemClock};
use llmfabric_store::{Cursor, Store};

use crate::output::OutputFormat;
use crate::{store_io, ExitError};

const LIST_PAGE_SIZE: usize = 256;

#[derive(Subcommand, Debug)]
pub enum ModelCommand {
    /// Declare a new model.
    Add {
        model: String,
        #[arg(long, default_value_t = 0)]
        context_length: u32,
        #[arg(long)]
        can_chat: bool,
        #[arg(long)]
        can_embed: bool,
        #[arg(long)]
        can_prompt: bool,
        #[arg(long)]
        can_stream: bool,
    },
    /// List declared models.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Remove a declared model by name.
    Rm { model: String },
}

pub async fn run(cmd: ModelCommand, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = store_io::load(snapshot_path).await?;

    match cmd {
        ModelCommand::Add { model, context_length, can_chat, can_embed, can_prompt, can_stream } => {
            let capabilities = CapabilityFlags { can_chat, can_embed, can_prompt, can_stream };
            let entity = Model::new(model.as_str(), capabilities, context_length, SystemClock.epoch_ms());
            store
                .append_model(entity)
                .await
                .map_err(|e| ExitError::new(1, format!("failed to declare model {model}: {e}")))?;
            store_io::save(&store, snapshot_path).await?;
            println!("declared model {model}");
        }
        ModelCommand::List { format } => {
            let models = list_all(&store).await?;
            print_models(&models, format)?;
        }
        ModelCommand::Rm { model } => {
            let entity = store
                .get_model_by_name(&model)
                .await
                .map_err(|e| ExitError::new(1, format!("no such model {model}: {e}")))?;
            store.delete_model(&entity.id).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            store_io::save(&store, snapshot_path).await?;
            println!("removed model {model}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

async fn list_all(store: &llmfabric_store::MemoryStore) -> anyhow::Result<Vec<Model>> {
    let mut out = Vec::new();
    let mut cursor = Cursor::START;
    loop {
        let page = store.list_models(cursor, LIST_PAGE_SIZE).await.context("listing models")?;
        out.extend(page.items);
        match page.next_cursor {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Ok(out)
}

fn print_models(models: &[Model], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(models)?),
        OutputFormat::Text => {
            if models.is_empty() {
                println!("no models declared");
                return Ok(());
            }
            for model in models {
                println!(
                    "{}\tcontext={}\tchat={}\tembed={}\tprompt={}\tstream={}",
                    model.model,
                    model.context_length,
                    model.capabilities.can_chat,
                    model.capabilities.can_embed,
                    model.capabilities.can_prompt,
                    model.capabilities.can_stream,
                );
            }
        }
    }
    Ok(())
}
