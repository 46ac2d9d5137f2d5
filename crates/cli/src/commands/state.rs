// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `llmfabric state` — runs one reconciliation tick against the declared
//! backends/models/pools in the shared snapshot and prints what each
//! backend actually reports, an operator surface onto the same cycle the
//! daemon runs on its own schedule.

use std::path::Path;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use llmfabric_bus::InMemoryBus;
use llmfabric_engine::{ReconcileMode as EngineReconcileMode, RuntimeState};
use llmfabric_store::Store;

use crate::output::OutputFormat;
use crate::store_io;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliReconcileMode {
    #[default]
    Global,
    Pool,
}

impl From<CliReconcileMode> for EngineReconcileMode {
    fn from(value: CliReconcileMode) -> Self {
        match value {
            CliReconcileMode::Global => EngineReconcileMode::Global,
            CliReconcileMode::Pool => EngineReconcileMode::Pool,
        }
    }
}

#[derive(Args, Debug)]
pub struct StateArgs {
    #[arg(long, value_enum, default_value_t = CliReconcileMode::Global)]
    mode: CliReconcileMode,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub async fn run(args: StateArgs, snapshot_path: &Path) -> anyhow::Result<()> {
    let store = Arc::new(store_io::load(snapshot_path).await?);
    let bus: Arc<dyn llmfabric_bus::Bus> = Arc::new(InMemoryBus::new());
    let store_trait: Arc<dyn Store> = store.clone();
    let runtime = RuntimeState::new(store_trait, bus);

    runtime.run_backend_cycle(args.mode.into()).await?;
    let states: Vec<_> = runtime.get().into_values().collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&states)?),
        OutputFormat::Text => {
            if states.is_empty() {
                println!("no backends declared");
            }
            for state in &states {
                match &state.error {
                    Some(err) => println!("{}\t{}\tERROR: {err}", state.name, state.backend_type),
                    None => println!(
                        "{}\t{}\tpulled=[{}]",
                        state.name,
                        state.backend_type,
                        state.pulled_models.join(", ")
                    ),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
