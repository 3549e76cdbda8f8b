// Souk - Marketplace Client Core
// Copyright (C) 2026 Souk Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::*;
use souk_observability::{init_tracing, LogFormat};

#[derive(Parser)]
#[command(name = "souk")]
#[command(version, about = "Souk marketplace client harness")]
#[command(
    long_about = "Drives the Souk client core from the command line: probe local videos,
run the compress-then-upload pipeline against Backblaze B2, and query Google
Places autocomplete."
)]
#[command(propagate_version = true)]
#[command(author = "Souk Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the compress-then-upload pipeline on a local video
    Upload(UploadCmd),

    /// Print size, duration, and the compression tier for a local video
    Probe(ProbeCmd),

    /// Query address autocomplete and optionally resolve a prediction
    Places(PlacesCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        let level = if cli.verbose { "debug" } else { "warn" };
        // Ignore errors if already initialized
        init_tracing(LogFormat::Pretty, Some(level)).ok();
    }

    match cli.command {
        Commands::Upload(cmd) => cmd.execute(cli.quiet).await,
        Commands::Probe(cmd) => cmd.execute().await,
        Commands::Places(cmd) => cmd.execute().await,
    }
}
