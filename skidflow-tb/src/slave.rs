//! AXI4-Stream slave: a TREADY generator.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// A number of cycles (or transfers), fixed or drawn anew every time it is used.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycles {
    /// Always the same number.
    Fixed(usize),
    /// Uniformly drawn from the range.
    Random(RangeInclusive<usize>),
}

impl Cycles {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            Cycles::Fixed(n) => *n,
            Cycles::Random(range) => rng.gen_range(range.clone()),
        }
    }
}

/// When the slave raises TREADY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyDelay {
    /// TREADY is tied high.
    Always,
    /// TREADY rises this many cycles after TVALID is seen.
    After(Cycles),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Waiting(usize),
    /// `None` means no limit on the number of transfers.
    Ready(Option<usize>),
}

/// AXI4-Stream slave.
///
/// Once TVALID is seen, TREADY is raised after the configured delay and kept high for the configured number of
/// consecutive transfers (0 means unlimited). Whenever TVALID falls, the sequence starts over. TREADY only depends on
/// what happened in earlier cycles, never on the current TVALID.
#[derive(Debug)]
pub struct AxisSlave {
    delay: ReadyDelay,
    consecutive: Cycles,
    rng: StdRng,
    phase: Phase,
}

impl AxisSlave {
    /// Creates a slave. `seed` makes random delays reproducible.
    pub fn new(delay: ReadyDelay, consecutive: Cycles, seed: u64) -> Self {
        Self { delay, consecutive, rng: StdRng::seed_from_u64(seed), phase: Phase::Idle }
    }

    /// Slave that accepts every transfer.
    pub fn always_ready() -> Self { Self::new(ReadyDelay::Always, Cycles::Fixed(0), 0) }

    /// Backward signals for the current cycle.
    pub fn bwd(&self) -> Ready {
        Ready::new(matches!(self.delay, ReadyDelay::Always) || matches!(self.phase, Phase::Ready(_)))
    }

    /// Observes the producer's forward signals for the current cycle.
    pub fn commit(&mut self, fwd: &Valid<AxisValue>) {
        if matches!(self.delay, ReadyDelay::Always) {
            return;
        }

        self.phase = match (self.phase, fwd.valid) {
            (_, false) => Phase::Idle,
            (Phase::Idle, true) => self.start_waiting(),
            (Phase::Waiting(remaining), true) => {
                if remaining <= 1 {
                    self.start_ready()
                } else {
                    Phase::Waiting(remaining - 1)
                }
            }
            (Phase::Ready(None), true) => Phase::Ready(None),
            (Phase::Ready(Some(remaining)), true) => {
                if remaining <= 1 {
                    Phase::Idle
                } else {
                    Phase::Ready(Some(remaining - 1))
                }
            }
        };
    }

    fn start_waiting(&mut self) -> Phase {
        let delay = match &self.delay {
            ReadyDelay::Always => 0,
            ReadyDelay::After(cycles) => cycles.sample(&mut self.rng),
        };
        if delay == 0 {
            self.start_ready()
        } else {
            Phase::Waiting(delay)
        }
    }

    fn start_ready(&mut self) -> Phase {
        match self.consecutive.sample(&mut self.rng) {
            0 => Phase::Ready(None),
            n => Phase::Ready(Some(n)),
        }
    }
}
