// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Replay a captured host byte stream through a `UsbSerialStream`.
//!
//! The input file is fed to an in-memory transport a few bytes per tick, the
//! stream is serviced once per tick, and every line the interpreter would see
//! is answered with `ok <line>` through `write_line`. Device output goes to
//! stdout; logging and the summary go to stderr.
//!
//! A line `M6` suspends reads the way a tool change does. The sentinel byte in
//! the input resumes them. Once the input is exhausted any active backup is
//! restored and drained, then released.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use cdc_stream::config::{self, ConfigError, StreamConfig};
use cdc_stream::observability::{debug_flags_help, init_logging, parse_debug_flags, ObservabilityConfig};
use cdc_stream::prelude::*;
use tracing::{info, warn};

/// Bytes the simulated host pushes per tick
const HOST_CHUNK: usize = 64;

/// Longest interpreter line kept; the rest is discarded
const MAX_LINE: usize = 128;

struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    write_chunk: Option<usize>,
    overrides: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Summary {
    ticks: usize,
    received: usize,
    lines: usize,
    realtime: usize,
    realtime_dropped: usize,
    tool_changes: usize,
    refused: usize,
    aborted: usize,
    transmitted: usize,
    overflowed: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: stream_replay --input <path> [--config <path>] [--write-chunk <n>] [--set <key>=<value>]...\n\n\
         Defaults:\n\
         - config: searched as cdc_stream.toml, built-in defaults if absent\n\
         - write-chunk: unlimited\n\n\
         {}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut input = None;
    let mut config = None;
    let mut write_chunk = None;
    let mut overrides = HashMap::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                input = Some(PathBuf::from(v));
            }
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                config = Some(PathBuf::from(v));
            }
            "--write-chunk" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                let n = v.parse::<usize>().unwrap_or_else(|_| {
                    eprintln!("Invalid --write-chunk value: {v}");
                    usage_and_exit();
                });
                write_chunk = Some(n);
            }
            "--set" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                let Some((key, value)) = v.split_once('=') else {
                    eprintln!("Expected <key>=<value>, got: {v}");
                    usage_and_exit();
                };
                overrides.insert(key.to_string(), value.to_string());
            }
            "-h" | "--help" => usage_and_exit(),
            // Handled by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    let input = input.unwrap_or_else(|| usage_and_exit());
    Args {
        input,
        config,
        write_chunk,
        overrides,
    }
}

/// Explicit file, else a discovered one, else defaults with overrides applied
fn resolve_config(args: &Args) -> Result<StreamConfig> {
    if let Some(path) = &args.config {
        return config::load_config(Some(path.as_path()), Some(&args.overrides))
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    match config::load_config(None, Some(&args.overrides)) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config file found, using defaults");
            let mut config = StreamConfig::default();
            config::apply_environment_overrides(&mut config);
            config::apply_cli_overrides(&mut config, &args.overrides);
            config::validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn main() {
    let debug_flags = parse_debug_flags();
    if let Err(e) = init_logging(&debug_flags, &ObservabilityConfig::default()) {
        eprintln!("{e:#}");
        process::exit(2);
    }

    let args = parse_args();
    match run(&args) {
        Ok(summary) => {
            eprintln!("{summary:#?}");
        }
        Err(e) => {
            eprintln!("stream_replay failed: {e:#}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<Summary> {
    let config = resolve_config(args)?;
    let input = fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
    info!(bytes = input.len(), path = %args.input.display(), "replaying host stream");

    let usb = match args.write_chunk {
        Some(chunk) => MemoryCdc::with_write_chunk(chunk),
        None => MemoryCdc::new(),
    };
    // The in-memory transport never frees space while we wait, so a stall
    // can only be resolved by giving up.
    let give_up = || false;
    let mut stream = UsbSerialStream::new(usb, RealtimeQueue::new(&config.realtime), give_up, &config);

    let mut stdout = io::stdout().lock();
    let mut summary = Summary::default();
    let mut line: Vec<u8> = Vec::with_capacity(MAX_LINE);
    let mut offset = 0;
    let mut restored = false;

    loop {
        summary.ticks += 1;

        let end = (offset + HOST_CHUNK).min(input.len());
        let pushed = stream.transport_mut().host_send(&input[offset..end]);
        offset += pushed;

        let report = stream.service().context("transport read failed")?;
        summary.received += report.received;
        if report.sentinel {
            summary.tool_changes += 1;
            info!(tick = summary.ticks, "tool change acknowledged, reads resumed");
        }

        while let Some(command) = stream.realtime_mut().pop() {
            summary.realtime += 1;
            info!(command = %format!("{command:#04x}"), "realtime command");
        }

        let mut consumed = false;
        while let Some(byte) = stream.read() {
            consumed = true;
            if byte != b'\n' {
                if byte != b'\r' && line.len() < MAX_LINE {
                    line.push(byte);
                }
                continue;
            }

            let text = String::from_utf8_lossy(&line).into_owned();
            line.clear();
            summary.lines += 1;

            match stream.write_line(&format!("ok {text}")) {
                Ok(outcome) if !outcome.is_complete() => summary.aborted += 1,
                Ok(_) => {}
                Err(StreamError::StagingOverflow { requested, .. }) => {
                    summary.refused += 1;
                    warn!(requested, "reply too long for staging buffer");
                }
                Err(e) => return Err(anyhow::anyhow!("transport write failed: {e}")),
            }

            if text.trim().eq_ignore_ascii_case("M6") {
                stream.suspend(true);
                info!("tool change requested, reads suspended");
                break;
            }
        }

        let sent = stream.transport_mut().take_transmitted();
        summary.transmitted += sent.len();
        stdout.write_all(&sent)?;

        if pushed > 0 || !report.is_idle() || consumed {
            continue;
        }

        if stream.backup_active() && !restored {
            restored = true;
            let has_data = stream.suspend(false);
            info!(has_data, "input stalled, restoring backed-up input");
            continue;
        }
        if offset < input.len() {
            warn!(remaining = input.len() - offset, "replay stalled before the end of input");
        }
        break;
    }

    if stream.release_backup() {
        info!("backup released");
    }
    if stream.rx_count() > 0 {
        warn!(
            unread = stream.rx_count(),
            mode = ?stream.read_mode(),
            "input left unread"
        );
    }

    summary.overflowed = stream.rx_overflowed();
    summary.realtime_dropped = stream.realtime().dropped();
    stdout.flush()?;
    Ok(summary)
}
