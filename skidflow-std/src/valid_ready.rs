//! Utilities for valid-ready channels.
//!
//! A transfer completes in a cycle if and only if `valid` (asserted by the producer) and `ready` (asserted by the
//! consumer) are both high in that cycle. Neither side may look at the other's decision for the same cycle before
//! making its own.

use std::marker::PhantomData;

use crate::*;

/// Valid-ready channel.
#[derive(Debug)]
pub struct VrChannel<V: Signal> {
    _marker: PhantomData<V>,
}

impl<V: Signal> Interface for VrChannel<V> {
    type Bwd = Ready;
    type Fwd = Valid<V>;
}

/// Valid/ready channel's forward signals.
///
/// `inner` is a don't-care value while `valid` is low.
#[derive(Debug, Clone, PartialEq, Eq, Signal)]
pub struct Valid<V: Signal> {
    /// Inner data
    #[member(name = "")]
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

/// Ready signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Signal)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl<V: Signal> Valid<V> {
    /// Creates a new value.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates a valid value.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Creates an invalid value carrying `placeholder` as its don't-care payload.
    pub fn invalid(placeholder: V) -> Self { Self::new(false, placeholder) }

    /// Returns the payload if a transfer completes against `bwd`.
    pub fn transfer(&self, bwd: &Ready) -> Option<&V> { is_transfer(self, bwd).then_some(&self.inner) }
}

impl Ready {
    /// Creates a new ready signal.
    pub fn new(ready: bool) -> Self { Self { ready } }
}

/// Whether a handshake completes in this cycle.
pub fn is_transfer<V: Signal>(fwd: &Valid<V>, bwd: &Ready) -> bool { fwd.valid && bwd.ready }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_needs_both_sides() {
        let fwd = Valid::valid(Bits::from_u64(8, 0x5a));
        assert!(is_transfer(&fwd, &Ready::new(true)));
        assert!(!is_transfer(&fwd, &Ready::new(false)));
        assert!(!is_transfer(&Valid::invalid(Bits::zero(8)), &Ready::new(true)));
        assert_eq!(fwd.transfer(&Ready::new(true)), Some(&Bits::from_u64(8, 0x5a)));
        assert_eq!(fwd.transfer(&Ready::new(false)), None);
    }

    #[test]
    fn invalid_payload_is_hidden() {
        let fwd = Valid::invalid(Bits::ones(4));
        assert_eq!(fwd.transfer(&Ready::new(true)), None);
    }

    #[test]
    fn derived_ports_flatten_inner() {
        let fwd = Valid::valid(Bits::zero(16));
        assert_eq!(
            fwd.port_decls().iter().collect::<Vec<_>>(),
            vec![(None, 16), (Some("valid".to_string()), 1)]
        );
        assert_eq!(fwd.transl().len(), 17);
        assert_eq!(Ready::default().port_decls().iter().collect::<Vec<_>>(), vec![(Some("ready".to_string()), 1)]);
    }

    #[test]
    fn reset_value_of_ready_is_deasserted() { assert!(!Ready::default().ready); }
}
