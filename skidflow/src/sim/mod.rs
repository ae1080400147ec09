//! Cycle-accurate simulation of a module.

use tracing::trace;

use crate::hir::*;

/// Signals of one simulated cycle, sampled before the state update.
#[derive(Debug)]
pub struct Step<I: Interface, O: Interface> {
    /// Cycle index, starting from 0.
    pub cycle: u64,

    /// Reset line (active low) as sampled in this cycle.
    pub resetn: bool,

    /// Input forward signals.
    pub i_fwd: I::Fwd,

    /// Input backward signals.
    pub i_bwd: I::Bwd,

    /// Output forward signals.
    pub o_fwd: O::Fwd,

    /// Output backward signals.
    pub o_bwd: O::Bwd,
}

/// Simulator that owns a module and its registers.
///
/// Each `tick` evaluates the module's logic against the current state, then commits the next state as a whole.
/// Reset is synchronous: while `resetn` is low `logic` is skipped, the output comes from `reset_fwd`, the input
/// backward signals are deasserted and the next state is the module's `init()`.
#[derive(Debug)]
pub struct Sim<M: Fsm> {
    module: M,
    state: M::S,
    resetn: bool,
    cycle: u64,
}

impl<M: Fsm> Sim<M> {
    /// Creates a simulator whose registers start from `init()`, with reset released.
    pub fn new(module: M) -> Self {
        let state = module.init();
        Self { module, state, resetn: true, cycle: 0 }
    }

    /// Simulated module.
    pub fn module(&self) -> &M { &self.module }

    /// Current registers.
    pub fn state(&self) -> &M::S { &self.state }

    /// Number of committed cycles.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Drives the reset line (active low). Takes effect from the next `tick`.
    pub fn set_resetn(&mut self, resetn: bool) { self.resetn = resetn; }

    /// Evaluates the current cycle without committing it.
    #[allow(clippy::type_complexity)]
    pub fn eval(
        &self, i_fwd: &<M::I as Interface>::Fwd, o_bwd: &<M::O as Interface>::Bwd,
    ) -> (<M::O as Interface>::Fwd, <M::I as Interface>::Bwd, M::S) {
        if self.resetn {
            self.module.logic(i_fwd, o_bwd, &self.state)
        } else {
            (self.module.reset_fwd(i_fwd, o_bwd, &self.state), Default::default(), self.module.init())
        }
    }

    /// Simulates one cycle and commits its state update.
    pub fn tick(&mut self, i_fwd: <M::I as Interface>::Fwd, o_bwd: <M::O as Interface>::Bwd) -> Step<M::I, M::O> {
        let (o_fwd, i_bwd, state_next) = self.eval(&i_fwd, &o_bwd);
        trace!(
            module = self.module.module_name(),
            cycle = self.cycle,
            resetn = self.resetn,
            state = ?state_next,
            "tick"
        );

        let step = Step { cycle: self.cycle, resetn: self.resetn, i_fwd, i_bwd, o_fwd, o_bwd };
        self.module.observe(&step);
        self.state = state_next;
        self.cycle += 1;
        step
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Pulse channel: a forward bit and a backward acknowledge.
    #[derive(Debug)]
    struct PulseChannel;

    impl Interface for PulseChannel {
        type Bwd = bool;
        type Fwd = bool;
    }

    /// Counts pulses and acknowledges every one of them.
    #[derive(Debug)]
    struct PulseCounter;

    impl Fsm for PulseCounter {
        type I = PulseChannel;
        type O = PulseChannel;
        type S = u32;

        fn module_name(&self) -> &str { "pulse_counter" }

        fn init(&self) -> u32 { 0 }

        fn logic(&self, i_fwd: &bool, o_bwd: &bool, state: &u32) -> (bool, bool, u32) {
            (*state % 2 == 1, !*o_bwd || *i_fwd, if *i_fwd { state + 1 } else { *state })
        }
    }

    /// Echoes its input and counts evaluations of its logic and committed cycles.
    #[derive(Debug, Default)]
    struct Echo {
        evaluated: Cell<u32>,
        observed: Cell<u32>,
    }

    impl Fsm for Echo {
        type I = PulseChannel;
        type O = PulseChannel;
        type S = ();

        fn module_name(&self) -> &str { "echo" }

        fn init(&self) {}

        fn logic(&self, i_fwd: &bool, o_bwd: &bool, _state: &()) -> (bool, bool, ()) {
            self.evaluated.set(self.evaluated.get() + 1);
            (*i_fwd, *o_bwd, ())
        }

        fn reset_fwd(&self, _i_fwd: &bool, _o_bwd: &bool, _state: &()) -> bool { false }

        fn observe(&self, step: &Step<PulseChannel, PulseChannel>) {
            assert_eq!(step.i_bwd, step.resetn && step.o_bwd);
            self.observed.set(self.observed.get() + 1);
        }
    }

    #[test]
    fn reset_skips_logic() {
        let mut sim = Sim::new(Echo::default());
        sim.set_resetn(false);
        let (o_fwd, i_bwd, _) = sim.eval(&true, &true);
        assert!(!o_fwd);
        assert!(!i_bwd);
        let step = sim.tick(true, true);
        assert!(!step.o_fwd);
        assert_eq!(sim.module().evaluated.get(), 0);
        assert_eq!(sim.module().observed.get(), 1);

        sim.set_resetn(true);
        let step = sim.tick(true, true);
        assert!(step.o_fwd && step.i_bwd);
        assert_eq!(sim.module().evaluated.get(), 1);
        assert_eq!(sim.module().observed.get(), 2);
    }

    #[test]
    fn outputs_are_sampled_before_commit() {
        let mut sim = Sim::new(PulseCounter);
        let step = sim.tick(true, false);
        assert_eq!(step.cycle, 0);
        assert!(!step.o_fwd);
        assert_eq!(*sim.state(), 1);

        let step = sim.tick(false, false);
        assert!(step.o_fwd);
        assert_eq!(*sim.state(), 1);
        assert_eq!(sim.cycle(), 2);
    }

    #[test]
    fn reset_forces_init_and_deasserts_backward() {
        let mut sim = Sim::new(PulseCounter);
        sim.tick(true, false);
        sim.tick(true, false);
        assert_eq!(*sim.state(), 2);

        sim.set_resetn(false);
        let step = sim.tick(true, false);
        assert!(!step.resetn);
        assert!(!step.i_bwd);
        assert_eq!(*sim.state(), 0);

        sim.set_resetn(true);
        let step = sim.tick(true, false);
        assert!(step.i_bwd);
        assert_eq!(*sim.state(), 1);
    }

    #[test]
    fn eval_does_not_commit() {
        let sim = Sim::new(PulseCounter);
        let (_, _, next) = sim.eval(&true, &true);
        assert_eq!(next, 1);
        assert_eq!(*sim.state(), 0);
        assert_eq!(sim.cycle(), 0);
    }
}
