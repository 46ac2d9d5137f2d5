// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use llmfabric::commands::{backend, credential, model, pool, resolve, state};
use llmfabric::{state_path, ExitError};

#[derive(Parser, Debug)]
#[command(name = "llmfabric", version, about = "Operator CLI for the llmfabric control plane")]
struct Cli {
    /// Overrides the shared store snapshot file (defaults to
    /// $LLMFABRIC_SNAPSHOT_PATH or a platform state directory).
    #[arg(long, global = true)]
    snapshot_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Declare and inspect backends.
    #[command(subcommand)]
    Backend(backend::BackendCommand),
    /// Declare and inspect models.
    #[command(subcommand)]
    Model(model::ModelCommand),
    /// Declare pools and bind backends/models to them.
    #[command(subcommand)]
    Pool(pool::PoolCommand),
    /// Set and inspect hosted-provider credentials.
    #[command(subcommand)]
    Credential(credential::CredentialCommand),
    /// Run one reconciliation tick and print observed backend state.
    State(state::StateArgs),
    /// Run the resolver once against the current state for manual testing.
    Resolve(resolve::ResolveArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let snapshot_path = state_path::resolve(cli.snapshot_path);

    let result = match cli.command {
        Command::Backend(cmd) => backend::run(cmd, &snapshot_path).await,
        Command::Model(cmd) => model::run(cmd, &snapshot_path).await,
        Command::Pool(cmd) => pool::run(cmd, &snapshot_path).await,
        Command::Credential(cmd) => credential::run(cmd, &snapshot_path).await,
        Command::State(args) => state::run(args, &snapshot_path).await,
        Command::Resolve(args) => resolve::run(args, &snapshot_path).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit) = e.downcast_ref::<ExitError>() {
                eprintln!("error: {}", exit.message);
                ExitCode::from(exit.code.clamp(0, 255) as u8)
            } else {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}
