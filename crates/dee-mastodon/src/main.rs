mod api;
mod cli;
mod commands;
mod config;
mod display;
mod entities;
mod models;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Commands},
    models::{ErrorJson, OutputMode},
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let output_mode = OutputMode {
        json: cli.global.json,
        quiet: cli.global.quiet,
        verbose: cli.global.verbose,
    };
    init_tracing(output_mode.verbose);

    let result = match &cli.command {
        Commands::Tags(args) => commands::tags(&args.command, &output_mode),
        Commands::Config(args) => commands::config(&args.command, &output_mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if output_mode.json {
                let body = ErrorJson {
                    ok: false,
                    error: err.to_string(),
                    code: models::classify_error_code(&err).to_string(),
                };
                match serde_json::to_string(&body) {
                    Ok(text) => println!("{text}"),
                    Err(_) => println!(
                        r#"{{"ok":false,"error":"Internal serialization error","code":"INTERNAL_ERROR"}}"#
                    ),
                }
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::from(1)
        }
    }
}

// Logs go to stderr so --json output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dee_mastodon=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
