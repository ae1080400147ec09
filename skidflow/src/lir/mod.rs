//! Low-level port descriptions.

mod prelude;

pub use prelude::*;
