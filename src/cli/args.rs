//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "addrspace",
    about = "Inspect the memory map of a running process",
    after_help = "\
EXAMPLES:
    addrspace my-app                         Auto-detect PID by name
    addrspace --pid 1234                     Explicit PID
    addrspace --pid 1234 --addr 0x7f45c123   Resolve an address
    addrspace --pid 1234 --export maps.json  Capture for offline analysis
    addrspace --maps-file maps.json --addr 0x7f45c123"
)]
pub struct Args {
    /// Process name to inspect (auto-detects PID)
    #[arg(value_name = "PROCESS")]
    pub process: Option<String>,

    /// Process ID to inspect
    #[arg(short, long)]
    pub pid: Option<i32>,

    /// Replay a previously exported snapshot instead of a live process
    #[arg(long, value_name = "FILE", conflicts_with_all = ["process", "pid"])]
    pub maps_file: Option<PathBuf>,

    /// Address to resolve, in hex (repeatable)
    #[arg(short, long, value_name = "ADDR", value_parser = parse_hex_addr)]
    pub addr: Vec<u64>,

    /// Parse a one-shot snapshot of the current instant (not reusable)
    #[arg(long)]
    pub uncached: bool,

    /// Drop mappings whose path ends with this suffix (repeatable)
    #[arg(long = "ignore-suffix", value_name = "SUFFIX")]
    pub ignore_suffixes: Vec<String>,

    /// Export the snapshot as JSON (for later --maps-file replay)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Suppress the region listing (queries and export only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Addresses follow the maps-listing convention: hex, `0x` optional.
fn parse_hex_addr(s: &str) -> Result<u64, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{s}': {e}"))
}
