//! Auto-detect a process PID from a process name.

use anyhow::{bail, Context, Result};
use std::fs;

use crate::domain::Pid;

/// Result of a process lookup.
#[derive(Debug)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub command: String,
}

/// Find a process by name.
///
/// Scans `/proc` and matches the given name against each process's comm
/// (`/proc/<pid>/comm`), exactly or as a substring.
///
/// # Errors
/// - No matching process
/// - Multiple matching processes (ambiguous)
pub fn find_process_by_name(name: &str) -> Result<ProcessInfo> {
    let mut matches: Vec<ProcessInfo> = Vec::new();

    let proc_dir = fs::read_dir("/proc").context("Failed to read /proc")?;

    for entry in proc_dir.flatten() {
        let file_name = entry.file_name();
        let Ok(pid) = file_name.to_string_lossy().parse::<libc::pid_t>() else {
            continue;
        };

        let Ok(comm) = fs::read_to_string(format!("/proc/{pid}/comm")) else {
            continue;
        };
        let command = comm.trim_end().to_string();

        if command == name || command.contains(name) {
            matches.push(ProcessInfo { pid: Pid(pid), command });
        }
    }

    match matches.len() {
        0 => bail!(
            "No process matching '{name}' found.\n\
             Check running processes with: ps aux | grep {name}"
        ),
        1 => Ok(matches.remove(0)),
        _ => {
            let list: Vec<String> =
                matches.iter().map(|m| format!("  {} ({})", m.pid.0, m.command)).collect();
            bail!(
                "Multiple processes match '{name}':\n{}\n\n\
                 Specify PID explicitly: addrspace --pid <PID>",
                list.join("\n")
            )
        }
    }
}
