//! Implementation of proc macros on signal values.
//!
//! # Note
//!
//! To use `#[derive(Signal)]` on struct, it is assumed that its `port_decls()` method
//! implementation of `Signal` trait is constructed as struct of its fields, and that both
//! `Signal` and `lir` are in scope at the derive site (`use skidflow::*;` brings both).
//!
//! For example, `port_decls()` method implementation of `Valid` is as follows.
//!
//! ```ignore
//! #[derive(Debug, Clone, Signal)]
//! pub struct Valid<V: Signal> {
//!     #[member(name = "")]
//!     inner: V,
//!     valid: bool,
//! }
//!
//! impl<V: Signal> Signal for Valid<V> {
//!     ...
//!     fn port_decls(&self) -> lir::PortDecls {
//!         lir::PortDecls::Struct(vec![
//!             (None, Signal::port_decls(&self.inner)),
//!             (Some("valid".to_string()), Signal::port_decls(&self.valid)),
//!         ])
//!     }
//! }
//! ```

mod signal;
mod utils;

use proc_macro::{self, TokenStream};

#[proc_macro_derive(Signal, attributes(member))]
pub fn signal(input: TokenStream) -> TokenStream { signal::derive(input) }
