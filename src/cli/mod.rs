//! Command-line interface for the addrspace binary

pub mod args;

pub use args::Args;
