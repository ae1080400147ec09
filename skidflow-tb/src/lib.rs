//! Testbench for AXI4-Stream modules: drivers, a monitor and a scoreboard.
//!
//! The testbench only talks to the module under test through its ports, one cycle at a time, the same way a
//! simulator-driven testbench talks to an RTL design.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(variant_size_differences)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(unreachable_pub)]
//
#![allow(elided_lifetimes_in_paths)]

use skidflow::*;
use skidflow_std::*;
use thiserror::Error;

pub mod factory;
mod master;
mod monitor;
mod scoreboard;
mod slave;
mod testbench;

pub use master::*;
pub use monitor::*;
pub use scoreboard::*;
pub use slave::*;
pub use testbench::*;

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TbError {
    #[error("word {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("cycle {cycle}: word {index} of the packet should be {expected}, got {got}")]
    Mismatch { cycle: u64, index: usize, expected: String, got: String },
    #[error("cycle {cycle}: received {got} but nothing more was expected")]
    Unexpected { cycle: u64, got: String },
    #[error("gave up after {cycles} cycles with {remaining} packets outstanding")]
    Timeout { cycles: u64, remaining: usize },
    #[error("stage error: {0}")]
    Stage(#[from] StageError),
}
