// src/lib.rs

pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod tracker;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, ConvertArgs, TailArgs};
use crate::config::{
    apply_convert_overrides, apply_tail_overrides, load_or_default, ConfigFile,
};
use crate::convert::{Converter, HecClient};
use crate::engine::{Runtime, Tracker, TrackerOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::tracker::FileStateStore;
use crate::types::RunMode;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI/env layering
/// - the tracker and its polling runtime (`tail`)
/// - the batch converter and HEC client (`convert`)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(args.config.as_deref())?;

    match &args.command {
        Command::Tail(tail) => {
            apply_tail_overrides(&mut raw, tail);
            let cfg = ConfigFile::try_from(raw)?;
            if args.dry_run {
                print_dry_run(&cfg, &args.command);
                return Ok(());
            }
            run_tail(&cfg).await
        }
        Command::Convert(convert) => {
            apply_convert_overrides(&mut raw, convert);
            let cfg = ConfigFile::try_from(raw)?;
            if args.dry_run {
                print_dry_run(&cfg, &args.command);
                return Ok(());
            }
            run_convert(&cfg).await
        }
    }
}

/// `tail`: one pass or a polling loop, depending on the run mode.
pub async fn run_tail(cfg: &ConfigFile) -> Result<()> {
    let tail = &cfg.tail;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    fs.create_dir_all(&tail.state_dir)?;
    let store = FileStateStore::new(tail.state_dir.clone(), Arc::clone(&fs));

    let options = TrackerOptions::new(tail.data_dir.clone())
        .with_extension(tail.extension.clone())
        .with_sourcetype(tail.sourcetype.clone());
    let tracker = Tracker::new(fs, Box::new(store), options);

    let cancel = CancellationToken::new();
    let mut runtime = Runtime::new(
        tracker,
        std::io::stdout(),
        Duration::from_secs(tail.poll_interval),
        cancel.clone(),
    );
    let state = runtime.load_state();

    match tail.mode {
        RunMode::Once => {
            let report = runtime.run_once(state);
            debug!(records = report.emitted, "single pass finished");
        }
        RunMode::Continuous => {
            // Ctrl-C → stop after the in-flight pass.
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                    return;
                }
                cancel.cancel();
            });
            runtime.run_forever(state).await;
        }
    }

    Ok(())
}

/// `convert`: convert the whole data directory once.
pub async fn run_convert(cfg: &ConfigFile) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let converter = Converter::new(fs, cfg.convert.clone());

    let client = match &cfg.hec {
        Some(hec) => {
            let client = HecClient::new(hec)?;
            info!(endpoint = client.endpoint(), "posting events to HEC");
            Some(client)
        }
        None => {
            info!("HEC host or token not configured; skipping indexing");
            None
        }
    };

    let summary = converter.convert_directory(client.as_ref()).await?;
    info!(
        converted = summary.converted,
        failed = summary.failed,
        events = summary.events,
        sent = summary.sent,
        "conversion finished"
    );
    Ok(())
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &ConfigFile, command: &Command) {
    println!("csvforward dry-run");
    match command {
        Command::Tail(TailArgs { .. }) => {
            let tail = &cfg.tail;
            println!("  tail.data_dir = {}", tail.data_dir.display());
            println!("  tail.state_dir = {}", tail.state_dir.display());
            println!("  tail.poll_interval = {}", tail.poll_interval);
            println!("  tail.sourcetype = {}", tail.sourcetype);
            println!("  tail.mode = {}", tail.mode);
            println!("  tail.extension = {}", tail.extension);
        }
        Command::Convert(ConvertArgs { .. }) => {
            let convert = &cfg.convert;
            println!("  convert.data_dir = {}", convert.data_dir.display());
            println!("  convert.output_dir = {}", convert.output_dir.display());
            println!("  convert.sourcetype = {}", convert.sourcetype);
            println!("  convert.host = {}", convert.host);
            println!("  convert.index = {}", convert.index);
            println!("  convert.extension = {}", convert.extension);
            match &cfg.hec {
                Some(hec) => {
                    println!(
                        "  hec = {}://{}:{} (batch_size = {}, verify_tls = {})",
                        hec.protocol, hec.host, hec.port, hec.batch_size, hec.verify_tls
                    );
                }
                None => println!("  hec = disabled"),
            }
        }
    }

    debug!("dry-run complete (no files processed)");
}
