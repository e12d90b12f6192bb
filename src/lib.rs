//! # addrspace - Process Memory Map Snapshots for Stack Unwinding
//!
//! addrspace models the memory-mapped regions of a process (your own or
//! another process under inspection) as a queryable, ordered collection.
//! Given an instruction address it answers the question a stack-walker asks
//! at every unwound frame: which loaded module contains this address, and
//! what are its permissions and backing path?
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  /proc/<pid>/maps (kernel)                │
//! └──────────────────────────┬────────────────────────────────┘
//!                            │ listing lines
//!                            ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                 addrspace (this crate)                    │
//! │                                                           │
//! │  ┌────────────┐   ┌──────────────┐   ┌───────────────┐  │
//! │  │ MapsSource │──▶│ RegionStore  │◀──│  MapSnapshot  │  │
//! │  │  (reader)  │   │ (parse+scan) │   │ (lock+rebuild)│  │
//! │  └────────────┘   └──────────────┘   └───────┬───────┘  │
//! │                                              │           │
//! │                                     ┌────────▼────────┐  │
//! │                                     │  AddressQuery   │  │
//! │                                     │ (fill_in/flags) │  │
//! │                                     └─────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`maps`]: The core model
//!   - `region`: One mapped range with permissions, offset, and path
//!   - `parse`: The `/proc/<pid>/maps` line format
//!   - `store`: Ordered collection with first-match address lookup
//!   - `snapshot`: Build modes (cached / uncached / static), wholesale
//!     rebuild, and the scoped iteration lock
//!   - `lookup`: The [`maps::AddressQuery`] capability trait
//!
//! - [`reader`]: Memory Reader collaborators
//!   - `MapsSource` supplies listing lines for a pid (default: `/proc`)
//!   - `ProcessMemory` optionally supplies raw memory bytes for richer
//!     unwinding backends
//!
//! - [`export`]: JSON export of a snapshot, and replay of a previously
//!   exported snapshot as a static region list
//!
//! - [`process_lookup`]: Resolve a process name to a PID via `/proc`
//!
//! - [`cli`]: Command-line argument parsing for the `addrspace` binary
//!
//! - [`domain`]: Core domain types ([`domain::Pid`]) and errors
//!
//! ## Snapshot Modes
//!
//! 1. **Cached** (default): built once at construction, explicitly
//!    rebuildable with [`maps::MapSnapshot::rebuild`]
//! 2. **Uncached**: a one-shot parse of the current instant; never
//!    rebuilt, and not meant to be reused as a stable long-lived view
//! 3. **Static**: built from an externally supplied region list; frozen
//!
//! ## Typical Usage
//!
//! ```bash
//! # Dump the memory map of a running process
//! addrspace my-app
//!
//! # Resolve an address against an explicit PID
//! addrspace --pid 1234 --addr 0x7f45c123
//!
//! # Capture a snapshot for offline analysis, replay it later
//! addrspace --pid 1234 --export maps.json
//! addrspace --maps-file maps.json --addr 0x7f45c123
//! ```
//!
//! ## Concurrency
//!
//! The only shared mutable resource is the region store. A rebuild replaces
//! its contents wholesale under a write lock; readers either see the old
//! store or the new one, never a partial view. Any traversal must go
//! through the guard returned by [`maps::MapSnapshot::regions`], which
//! holds the read lock for the guard's lifetime.

pub mod cli;
pub mod domain;
pub mod export;
pub mod maps;
pub mod process_lookup;
pub mod reader;
