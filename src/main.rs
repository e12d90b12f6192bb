//! # addrspace - Main Entry Point
//!
//! Supports three operational modes:
//! - **Live** (`--pid <PID>` or `addrspace <PROCESS>`): snapshot a running
//!   process's memory map and query it
//! - **Uncached** (`--uncached`): one-shot parse of the current instant
//! - **Replay** (`--maps-file maps.json`): query a previously exported
//!   snapshot without touching a live process

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use addrspace::cli::Args;
use addrspace::domain::Pid;
use addrspace::export::{maps_json, SnapshotExporter};
use addrspace::maps::{AddressQuery, MapSnapshot, SnapshotOptions};
use addrspace::process_lookup::find_process_by_name;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}").to_lowercase();
    if msg.contains("permission denied") {
        EXIT_NOPERM
    } else if msg.contains("missing required argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let options = SnapshotOptions { suffixes_to_ignore: args.ignore_suffixes.clone() };

    let snapshot = build_snapshot(&args, options)?;

    if snapshot.is_empty() {
        info!("snapshot for {} holds no regions", snapshot.pid());
    }
    if snapshot.skipped_lines() > 0 {
        info!("{} unparseable listing lines skipped", snapshot.skipped_lines());
    }

    if !args.quiet {
        // Hold the iteration lock for the whole listing.
        let guard = snapshot.regions();
        for region in &guard {
            println!("{region}");
        }
    }

    for &addr in &args.addr {
        match snapshot.fill_in(addr) {
            Some(region) => println!("{addr:#x} -> {region}"),
            None => println!("{addr:#x} -> not mapped"),
        }
    }

    if let Some(ref path) = args.export {
        SnapshotExporter::new(&snapshot)
            .export_to_file(path)
            .with_context(|| format!("Failed to export snapshot to {}", path.display()))?;
        info!("exported {} regions to {}", snapshot.len(), path.display());
    }

    Ok(())
}

fn build_snapshot(args: &Args, options: SnapshotOptions) -> Result<MapSnapshot> {
    // Mode A: replay a previously exported snapshot.
    if let Some(ref path) = args.maps_file {
        let (pid, regions) = maps_json::import_from_file(path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
        return Ok(MapSnapshot::from_regions(pid, regions, options));
    }

    // Mode B: live process.
    let pid = resolve_pid(args)?;
    let snapshot = if args.uncached {
        MapSnapshot::new_uncached_with(pid, options)
    } else {
        MapSnapshot::new_with(pid, options)
    };
    snapshot.with_context(|| format!("Failed to snapshot memory maps of {pid}"))
}

/// Resolve the target PID from CLI arguments.
///
/// Supports `addrspace my-app` (lookup by name) and
/// `addrspace --pid 1234` (explicit).
fn resolve_pid(args: &Args) -> Result<Pid> {
    if let Some(ref name) = args.process {
        if args.pid.is_some() {
            anyhow::bail!(
                "Cannot use PROCESS argument with --pid.\n\n\
                 Use either:\n  \
                 addrspace my-app          (auto-detect)\n  \
                 addrspace --pid 1234      (explicit PID)"
            );
        }
        let info = find_process_by_name(name)?;
        info!("resolved '{name}' to {} ({})", info.pid, info.command);
        return Ok(info.pid);
    }

    if let Some(pid) = args.pid {
        return Ok(Pid(pid));
    }

    anyhow::bail!(
        "Missing required argument: PROCESS, --pid, or --maps-file\n\n\
         Usage:\n  \
         addrspace my-app              Auto-detect PID by name\n  \
         addrspace --pid 1234          Explicit PID\n  \
         addrspace --maps-file m.json  Replay an exported snapshot\n\n\
         Run 'addrspace --help' for more options"
    )
}
