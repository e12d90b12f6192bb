//! Address query capabilities.
//!
//! The mandatory capability set is region lookup and permission checks,
//! which every snapshot supports from metadata alone. Function-name
//! resolution and raw memory access are extension capabilities: they
//! default to "unsupported" and are only wired up by implementations
//! paired with a richer unwinding backend.

use std::sync::Arc;

use super::region::{MapRegion, Protection};
use crate::reader::ProcessMemory;

/// A function identity resolved by a symbol-aware backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFunction {
    pub name: String,
    /// Offset of the queried pc from the function's start.
    pub offset: u64,
}

/// Address-to-region resolution over a region collection.
///
/// All query methods are total: an address outside any mapped region is a
/// normal outcome reported as `None` or an empty flag set, never an error.
pub trait AddressQuery {
    /// The record whose `[start, end)` range contains `addr`, or `None`.
    ///
    /// When the underlying store holds overlapping records, the first
    /// record in store order wins.
    fn fill_in(&self, addr: u64) -> Option<MapRegion>;

    /// Permission bits at `addr`; empty when the address is unmapped.
    fn flags(&self, addr: u64) -> Protection {
        self.fill_in(addr).map_or_else(Protection::empty, |region| region.flags)
    }

    fn is_readable(&self, addr: u64) -> bool {
        self.flags(addr).contains(Protection::READ)
    }

    fn is_writable(&self, addr: u64) -> bool {
        self.flags(addr).contains(Protection::WRITE)
    }

    fn is_executable(&self, addr: u64) -> bool {
        self.flags(addr).contains(Protection::EXEC)
    }

    /// Function-name resolution for a pc. Only symbol-aware backends
    /// override this; the base contract works without it.
    fn function_name(&self, _pc: u64) -> Option<ResolvedFunction> {
        None
    }

    /// Raw memory access for the snapshot's process, when a memory
    /// reader has been wired up.
    fn process_memory(&self) -> Option<Arc<dyn ProcessMemory>> {
        None
    }
}

impl AddressQuery for super::store::RegionStore {
    fn fill_in(&self, addr: u64) -> Option<MapRegion> {
        self.find(addr).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegion(MapRegion);

    impl AddressQuery for FixedRegion {
        fn fill_in(&self, addr: u64) -> Option<MapRegion> {
            self.0.contains(addr).then(|| self.0.clone())
        }
    }

    fn exec_region() -> FixedRegion {
        FixedRegion(MapRegion {
            start: 0x1000,
            end: 0x2000,
            flags: Protection::READ | Protection::EXEC,
            ..MapRegion::default()
        })
    }

    #[test]
    fn test_flag_projections() {
        let query = exec_region();
        assert!(query.is_readable(0x1800));
        assert!(query.is_executable(0x1800));
        assert!(!query.is_writable(0x1800));
    }

    #[test]
    fn test_miss_yields_empty_flags() {
        let query = exec_region();
        assert!(query.fill_in(0x3000).is_none());
        assert_eq!(query.flags(0x3000), Protection::empty());
        assert!(!query.is_readable(0x3000));
        assert!(!query.is_writable(0x3000));
        assert!(!query.is_executable(0x3000));
    }

    #[test]
    fn test_extension_capabilities_default_unsupported() {
        let query = exec_region();
        assert!(query.function_name(0x1800).is_none());
        assert!(query.process_memory().is_none());
    }
}
