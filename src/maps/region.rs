//! Region records: one contiguous mapped range with its attributes.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Permission and classification bits of a mapped region.
    ///
    /// `READ`/`WRITE`/`EXEC` mirror the kernel's `rwx` permission
    /// characters. `DEVICE` is a classification, not a permission: it marks
    /// a mapping whose backing path lives under `/dev/` (ashmem mappings
    /// under `/dev/ashmem/` are ordinary memory and do not get the bit).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Protection: u32 {
        const READ = 0x1;
        const WRITE = 0x2;
        const EXEC = 0x4;
        const DEVICE = 0x8000;
    }
}

impl Protection {
    /// Render the permission bits in `/proc` maps style, e.g. `r-x`.
    #[must_use]
    pub fn perm_string(&self) -> String {
        let mut s = String::with_capacity(3);
        s.push(if self.contains(Self::READ) { 'r' } else { '-' });
        s.push(if self.contains(Self::WRITE) { 'w' } else { '-' });
        s.push(if self.contains(Self::EXEC) { 'x' } else { '-' });
        s
    }

    /// Parse `rwx` permission characters back into bits.
    ///
    /// Unknown characters (the share bit `p`/`s`, `-`) are ignored, the
    /// way the kernel format intends.
    #[must_use]
    pub fn from_perm_chars(perms: &str) -> Self {
        let mut flags = Self::empty();
        for c in perms.chars() {
            match c {
                'r' => flags |= Self::READ,
                'w' => flags |= Self::WRITE,
                'x' => flags |= Self::EXEC,
                _ => {}
            }
        }
        flags
    }
}

impl Default for Protection {
    fn default() -> Self {
        Self::empty()
    }
}

/// One contiguous mapped range in a process's address space.
///
/// A record is valid iff `end > start`; the default value (all zeros) is
/// the historical "not found" sentinel and never classifies as valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapRegion {
    pub start: u64,
    pub end: u64,
    /// File offset the range was mapped at.
    pub offset: u64,
    /// Load bias applied by the loader. The maps listing does not carry
    /// it, so parsed records leave it zero for an unwinder backend to
    /// fill in from the ELF headers.
    pub load_bias: u64,
    pub flags: Protection,
    /// Backing path, or empty for anonymous mappings.
    pub name: String,
}

impl MapRegion {
    /// Check if an address falls within `[start, end)`.
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }

    /// A record describes a real range only when `end > start`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Whether the backing path lives under a device filesystem prefix.
    #[must_use]
    pub fn is_device(&self) -> bool {
        self.flags.contains(Protection::DEVICE)
    }
}

impl fmt::Display for MapRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:016x}-{:016x} {} {:08x} {}",
            self.start,
            self.end,
            self.flags.perm_string(),
            self.offset,
            self.name
        )
    }
}
