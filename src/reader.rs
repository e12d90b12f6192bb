//! Memory Reader collaborators.
//!
//! The snapshot itself only needs one thing from the outside world: the
//! ordered mapping-listing lines for a process id. Richer unwinding
//! backends additionally need raw memory reads. Both are traits so tests
//! and remote-process tooling can substitute their own backends; the
//! default implementations read the `/proc` pseudo-filesystem.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::FileExt;

use crate::domain::Pid;

/// Supplies the raw per-process mapping listing.
pub trait MapsSource {
    /// Ordered mapping-listing lines for the target process.
    ///
    /// # Errors
    /// Fails fast when the listing cannot be read (process exited,
    /// permission denied); nothing here blocks beyond that bounded read.
    fn map_lines(&self, pid: Pid) -> io::Result<Vec<String>>;
}

/// Raw memory access into a process's address space.
pub trait ProcessMemory: Send + Sync {
    /// Read bytes at an absolute address, returning how many were read.
    ///
    /// # Errors
    /// Propagates the backend's io error; an unmapped address is an error
    /// here, unlike region lookup which is total.
    fn read_at(&self, addr: u64, buf: &mut [u8]) -> io::Result<usize>;
}

/// Default listing backend reading `/proc/<pid>/maps`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcFs;

impl MapsSource for ProcFs {
    fn map_lines(&self, pid: Pid) -> io::Result<Vec<String>> {
        let file = File::open(format!("/proc/{}/maps", pid.0))?;
        BufReader::new(file).lines().collect()
    }
}

/// Memory backend over `/proc/<pid>/mem`, opened once at attach time.
#[derive(Debug)]
pub struct ProcMemory {
    file: File,
}

impl ProcMemory {
    /// Open the memory pseudo-file for the target process.
    ///
    /// # Errors
    /// Fails when the process does not exist or ptrace access rules deny
    /// the open.
    pub fn attach(pid: Pid) -> io::Result<Self> {
        let file = File::open(format!("/proc/{}/mem", pid.0))?;
        Ok(Self { file })
    }
}

impl ProcessMemory for ProcMemory {
    fn read_at(&self, addr: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read_at(buf, addr)
    }
}
