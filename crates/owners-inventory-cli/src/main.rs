//! OWNERS Inventory CLI
//!
//! A command-line tool that collects `jira-project` and `jira-component`
//! declarations from a repository's OWNERS files and reports them to the
//! inventory service.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;
use cli::config::{DeliveryMode, ExitCode, RunConfig, SourceConfig, create_octocrab};
use cli::endor::{EndorClient, codeowners_url};
use cli::github::OctocrabSource;
use cli::output::{HumanOutput, write_json_payload};
use owners_inventory_core::{CodeOwnersPayload, LocalSource, OwnersSource, aggregate_source};

#[tokio::main]
async fn main() -> StdExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose, args.json);

    // Set up signal handling for graceful shutdown
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_clone = terminated.clone();

    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }

        terminated_clone.store(true, Ordering::SeqCst);
    });

    let exit_code = run(args, &terminated).await;

    // Check if we were terminated by signal
    if terminated.load(Ordering::SeqCst) {
        return StdExitCode::from(ExitCode::Terminated as u8);
    }

    StdExitCode::from(i32::from(exit_code) as u8)
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Stdout carries only the payload in JSON mode
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["octocrab=warn", "hyper=warn", "hyper_util=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Builds the OWNERS source selected by the configuration.
fn build_source(source: &SourceConfig) -> Result<Box<dyn OwnersSource>, String> {
    match source {
        SourceConfig::Local { root, walker } => {
            info!("Reading OWNERS files from {}", root.display());
            Ok(Box::new(
                LocalSource::new(root.clone()).with_walker_config(walker.clone()),
            ))
        }
        SourceConfig::GitHub(github) => {
            if github.token.is_none() {
                warn!("No GitHub token configured; only public repositories can be read");
            }
            let client = create_octocrab(github).map_err(|e| e.to_string())?;
            info!("Reading OWNERS files from {}/{}", github.owner, github.repo);
            Ok(Box::new(OctocrabSource::new(
                client,
                github.owner.as_str(),
                github.repo.as_str(),
                github.reference.clone(),
            )))
        }
    }
}

/// Run the reporter with the given arguments.
async fn run(args: Args, terminated: &AtomicBool) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();

    // Validate configuration
    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            write_error(&mut stderr, &e.to_string(), use_colors);
            return ExitCode::StartupFailure;
        }
    };

    let use_colors = !config.json_output && io::stdout().is_terminal();
    let error_colors = !config.json_output && io::stderr().is_terminal();

    debug!("Validated configuration: {:?}", config);
    info!(
        "Collecting OWNERS metadata for {} ({})",
        args.full_repository_name(),
        if config.delivery.is_dry_run() {
            "dry run"
        } else {
            "submitting"
        }
    );

    let source = match build_source(&config.source) {
        Ok(source) => source,
        Err(e) => {
            write_error(&mut stderr, &e, error_colors);
            return ExitCode::StartupFailure;
        }
    };

    // Discover, fetch and aggregate
    let result = match aggregate_source(source.as_ref(), config.concurrency).await {
        Ok(result) => result,
        Err(e) => {
            write_error(
                &mut stderr,
                &format!("Failed to collect OWNERS files: {}", e),
                error_colors,
            );
            return ExitCode::StartupFailure;
        }
    };

    // Check for termination
    if terminated.load(Ordering::SeqCst) {
        return ExitCode::Terminated;
    }

    let payload = CodeOwnersPayload::new(&config.target, &result.map);
    let url = match codeowners_url(&config.api_url, &config.target.namespace) {
        Ok(url) => url,
        Err(e) => {
            write_error(&mut stderr, &e.to_string(), error_colors);
            return ExitCode::StartupFailure;
        }
    };

    if config.json_output {
        if let Err(e) = write_json_payload(&mut stdout, &payload) {
            error!("Failed to write JSON output: {}", e);
            return ExitCode::StartupFailure;
        }
    } else {
        let mut output = HumanOutput::new(&mut stdout, use_colors);
        let written = output
            .write_ownership(&result.map)
            .and_then(|_| output.write_summary(&result.stats, result.map.len()));
        if let Err(e) = written {
            error!("Failed to write output: {}", e);
            return ExitCode::StartupFailure;
        }
    }

    let token = match config.delivery {
        DeliveryMode::DryRun => {
            if !config.json_output {
                let mut output = HumanOutput::new(&mut stdout, use_colors);
                if let Err(e) = output.write_dry_run(url.as_str(), &payload) {
                    error!("Failed to write output: {}", e);
                    return ExitCode::StartupFailure;
                }
            }
            info!("Dry run complete; nothing was sent");
            return ExitCode::Success;
        }
        DeliveryMode::Submit { token } => token,
    };

    // Never deliver once a shutdown was requested
    if terminated.load(Ordering::SeqCst) {
        return ExitCode::Terminated;
    }

    let client = EndorClient::new(config.api_url.as_str(), token);
    match client.submit(&payload).await {
        Ok(submission) => {
            if !config.json_output {
                let mut output = HumanOutput::new(&mut stdout, use_colors);
                if let Err(e) = output.write_submission(url.as_str(), &submission) {
                    error!("Failed to write output: {}", e);
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            write_error(
                &mut stderr,
                &format!("Failed to post code owner data to {}: {}", url, e),
                error_colors,
            );
            ExitCode::DeliveryFailed
        }
    }
}

/// Write an error message to the writer.
fn write_error<W: Write>(writer: &mut W, message: &str, use_colors: bool) {
    let mut output = HumanOutput::new(writer, use_colors);
    let _ = output.write_error(message);
}
