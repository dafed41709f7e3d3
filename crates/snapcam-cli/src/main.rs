// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod capture;
mod error;
mod find;
mod list;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;

/// snapcam - Find V4L2 cameras, list their formats, grab a snapshot
#[derive(Parser)]
#[command(name = "snapcam")]
#[command(version)]
#[command(about = "snapcam - Find V4L2 cameras, list their formats, grab a snapshot")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Without a subcommand, capture a snapshot from /dev/video0
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe V4L2 device indices and print the usable cameras
    Find(find::Args),

    /// List V4L2 capture devices with formats, frame sizes and intervals
    List(list::Args),

    /// Capture a single frame and save it as an image
    Capture(capture::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(Commands::Find(args)) => find::execute(args, cli.json),
        Some(Commands::List(args)) => list::execute(args, cli.json),
        Some(Commands::Capture(args)) => capture::execute(args, cli.json),
        None => capture::execute(capture::Args::default(), cli.json),
    };

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    // RUST_LOG takes precedence over the flags
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None) // Disable timestamps for cleaner CLI output
        .format_target(false) // Disable target (module path) for cleaner output
        .init();

    log::debug!("Logging initialized");
}
