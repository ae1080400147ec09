//! High-level signal and module vocabulary.

mod interface;
mod module_fsm;
mod signal;

pub use interface::*;
pub use module_fsm::*;
pub use signal::*;
