//! Finite state machine (Mealy machine).

use std::fmt;

use crate::hir::*;
use crate::sim::Step;

/// Finite state machine (Mealy machine).
///
/// `logic` describes (1) the current-cycle outputs; and (2) the next-cycle state, both as pure functions of the
/// current-cycle inputs and state. Clock and reset are not part of the logic: the simulator samples reset together
/// with the other inputs and, while it is held, substitutes `reset_fwd` for the outputs and `init()` for the next
/// state.
pub trait Fsm: fmt::Debug {
    /// Input interface.
    type I: Interface;

    /// Output interface.
    type O: Interface;

    /// Registers.
    type S: fmt::Debug + Clone;

    /// Module name.
    fn module_name(&self) -> &str;

    /// Value of the registers after reset.
    fn init(&self) -> Self::S;

    /// Computes `(output forward, input backward, next state)`.
    #[allow(clippy::type_complexity)]
    fn logic(
        &self, i_fwd: &<Self::I as Interface>::Fwd, o_bwd: &<Self::O as Interface>::Bwd, state: &Self::S,
    ) -> (<Self::O as Interface>::Fwd, <Self::I as Interface>::Bwd, Self::S);

    /// Output forward signals while reset is held. The simulator calls this instead of `logic` in that cycle.
    ///
    /// Defaults to `logic`'s forward output. Modules whose `logic` does work beyond computing outputs override it.
    fn reset_fwd(
        &self, i_fwd: &<Self::I as Interface>::Fwd, o_bwd: &<Self::O as Interface>::Bwd, state: &Self::S,
    ) -> <Self::O as Interface>::Fwd {
        self.logic(i_fwd, o_bwd, state).0
    }

    /// Called once per committed cycle, after reset gating.
    fn observe(&self, _step: &Step<Self::I, Self::O>) {}
}
