//! # Process Memory-Map Model
//!
//! This module is the core of the crate: a snapshot of a process's mapped
//! regions, queryable by address, safe to iterate while another thread
//! requests a rebuild.
//!
//! ## The Lookup Problem
//!
//! A stack-walker unwinding a crashed thread holds a program counter for
//! every frame. Before it can interpret the frame it must know which loaded
//! module the pc belongs to, whether that range is executable, and where
//! the module's file is. The kernel exposes this as text in
//! `/proc/<pid>/maps`:
//!
//! ```text
//! 7f45c000-7f45e000 r-xp 00000000 08:01 123456   /system/lib/libc.so
//! ```
//!
//! This module parses those lines into [`MapRegion`] records, keeps them in
//! listing order in a [`RegionStore`], and resolves addresses with a
//! first-match scan. The listing is *not* assumed to be sorted, so lookup
//! is deliberately linear rather than binary search.
//!
//! ## Rebuild vs. Readers
//!
//! Mappings change while a process runs (dlopen, mmap). A live snapshot can
//! be rebuilt in place; the store is replaced wholesale under a write lock
//! so a concurrent reader sees either the old contents or the new, never a
//! half-built sequence. Traversals go through the RAII guard returned by
//! [`MapSnapshot::regions`].

pub mod lookup;
pub mod parse;
pub mod region;
pub mod snapshot;
pub mod store;

pub use lookup::{AddressQuery, ResolvedFunction};
pub use parse::parse_line;
pub use region::{MapRegion, Protection};
pub use snapshot::{MapSnapshot, RegionsGuard, SnapshotOptions};
pub use store::RegionStore;
