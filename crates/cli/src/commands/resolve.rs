// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric resolve` — runs a tick, projects providers, and drives the
//! resolver once for manual testing. On `NoSatisfactoryModel`, prints the
//! rejected-candidate diagnostic table instead of
//! just the error string.

use std::path::Path;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use llmfabric_adapters::project;
use llmfabric_bus::InMemoryBus;
use llmfabric_core::{BackendType, ResolverError};
use llmfabric_engine::{ReconcileMode, ResolveRequest, Resolver, RuntimeState};
use llmfabric_store::Store;

use crate::store_io;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Capability {
    Chat,
    Embed,
    Prompt,
    Stream,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Capability the resolved provider must satisfy.
    #[arg(long, value_enum, default_value_t = Capability::Chat)]
    capability: Capability,
    /// Restrict to these provider types; defaults to ollama+vllm.
    #[arg(long = "type", value_delimiter = ',')]
    provider_types: Vec<String>,
    /// Preference list in priority order.
    #[arg(long = "model", value_delimiter = ',')]
    model_names: Vec<String>,
    #[arg(long, default_value_t = 2048)]
    context_length: i64,
    #[arg(long, default_value = "auto")]
    policy: String,
}

pub async fn run(args: ResolveArgs, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = Arc::new(store_io::load(snapshot_path).await?);
    let bus: Arc<dyn llmfabric_bus::Bus> = Arc::new(InMemoryBus::new());
    let store_trait: Arc<dyn Store> = store.clone();
    let runtime = RuntimeState::new(store_trait, bus);
    runtime.run_backend_cycle(ReconcileMode::Global).await?;

    let states: Vec<_> = runtime.get().into_values().collect();
    let grouped = project(&states);
    let providers: Vec<_> = grouped.into_values().flatten().collect();

    let provider_types = args
        .provider_types
        .iter()
        .map(|s| s.parse::<BackendType>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| crate::ExitError::new(2, format!("invalid --type: {e}")))?;

    let request = ResolveRequest { provider_types, model_names: args.model_names, context_length: args.context_length };
    let resolver = Resolver::new();

    let outcome = match args.capability {
        Capability::Chat => resolver.chat(&request, &providers, &args.policy).map(|(_, name)| name),
        Capability::Embed => resolver.embed(&request, &providers, &args.policy).map(|(_, name)| name),
        Capability::Prompt => resolver.prompt(&request, &providers, &args.policy).map(|(_, name)| name),
        Capability::Stream => resolver.stream(&request, &providers, &args.policy).map(|(_, name)| name),
    };

    match outcome {
        Ok(model_name) => println!("resolved: {model_name}"),
        Err(ResolverError::NoSatisfactoryModel { diagnostic, rejected }) => {
            println!("{diagnostic}");
            println!("id\tmodel\tcontext\tchat\tembed\tprompt\tstream\treason");
            for candidate in rejected {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    candidate.provider_id,
                    candidate.model_name,
                    candidate.context_length,
                    candidate.can_chat,
                    candidate.can_embed,
                    candidate.can_prompt,
                    candidate.can_stream,
                    candidate.reason,
                );
            }
            return Err(crate::ExitError::new(1, "no satisfactory model").into());
        }
        Err(e) => return Err(crate::ExitError::new(1, e.to_string()).into()),
    }

    Ok(())
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
