//! Subcommand modules for the `sgmash` binary.

pub mod all;
pub mod calculate;
pub mod filter;
pub mod plot;
