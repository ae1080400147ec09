//! Elastic register stage (skid buffer) for AXI4-Stream channels.
//!
//! The stage holds at most one transaction. Its upstream ready only depends on the downstream ready and its own
//! occupancy, so a full stage still accepts a new transaction in the same cycle the held one leaves.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::*;

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("port `{port}` is {upstream} bits wide upstream but {downstream} bits wide downstream")]
    WidthMismatch { port: String, upstream: usize, downstream: usize },
    #[error("a pipeline needs at least one stage")]
    EmptyPipeline,
}

/// Stage's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState {
    /// No transaction held; downstream valid is low.
    Empty,

    /// Holds one already-transformed transaction; downstream valid is high.
    Occupied(AxisValue),
}

impl StageState {
    /// Whether a transaction is held.
    pub fn is_occupied(&self) -> bool { matches!(self, StageState::Occupied(_)) }

    /// Held transaction.
    pub fn held(&self) -> Option<&AxisValue> {
        match self {
            StageState::Empty => None,
            StageState::Occupied(value) => Some(value),
        }
    }
}

/// What one cycle does to the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Upstream handshake completed: the transformed incoming transaction replaces whatever was held.
    Admit,
    /// No upstream handshake and downstream took the held transaction.
    Drain,
    /// Nothing moved in.
    Hold,
}

/// Upstream ready of a stage.
pub fn upstream_ready(resetn: bool, downstream_ready: bool, occupied: bool) -> bool {
    resetn && (downstream_ready || !occupied)
}

/// Decides the transition of a stage in one cycle.
///
/// Admission takes priority over draining: when a full stage is drained and refilled in the same cycle, the old
/// transaction leaves through the downstream handshake and the new one is held.
pub fn transition(occupied: bool, upstream_valid: bool, upstream_ready: bool, downstream_ready: bool) -> Transition {
    if upstream_valid && upstream_ready {
        Transition::Admit
    } else if occupied && downstream_ready {
        Transition::Drain
    } else {
        Transition::Hold
    }
}

/// Single-entry elastic register stage with a transform applied on admission.
pub struct SkidBuffer<T = Invert> {
    config: AxisConfig,
    transform: T,
    /// Don't-care payload driven downstream while empty.
    placeholder: AxisValue,
}

impl<T> fmt::Debug for SkidBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SkidBuffer").field("config", &self.config).finish_non_exhaustive()
    }
}

impl<T: Transform> SkidBuffer<T> {
    /// Creates a stage between an upstream and a downstream port.
    ///
    /// Both ports must be valid and have identical shapes.
    pub fn new(upstream: AxisConfig, downstream: AxisConfig, transform: T) -> Result<Self, StageError> {
        upstream.validate()?;
        downstream.validate()?;

        if let Some(mismatch) = upstream.channel_typ().first_mismatch(&downstream.channel_typ()) {
            return Err(StageError::WidthMismatch {
                port: mismatch.name,
                upstream: mismatch.left,
                downstream: mismatch.right,
            });
        }

        Ok(Self { config: upstream, transform, placeholder: upstream.blank() })
    }

    /// Creates a stage whose upstream and downstream ports share `config`.
    pub fn symmetric(config: AxisConfig, transform: T) -> Result<Self, StageError> {
        Self::new(config, config, transform)
    }

    /// Port shape.
    pub fn config(&self) -> &AxisConfig { &self.config }

    /// Downstream forward signals. Depends only on the state.
    pub fn output(&self, state: &StageState) -> Valid<AxisValue> {
        match state {
            StageState::Empty => Valid::invalid(self.placeholder.clone()),
            StageState::Occupied(value) => Valid::valid(value.clone()),
        }
    }
}

impl SkidBuffer<Invert> {
    /// Creates a stage inverting TDATA and TUSER.
    pub fn inverter(config: AxisConfig) -> Result<Self, StageError> { Self::symmetric(config, Invert::default()) }
}

impl<T: Transform> Fsm for SkidBuffer<T> {
    type I = AxisChannel;
    type O = AxisChannel;
    type S = StageState;

    fn module_name(&self) -> &str { "buffer_skid" }

    fn init(&self) -> StageState { StageState::Empty }

    /// Only evaluated with reset released.
    fn logic(
        &self, i_fwd: &Valid<AxisValue>, o_bwd: &Ready, state: &StageState,
    ) -> (Valid<AxisValue>, Ready, StageState) {
        let occupied = state.is_occupied();
        let i_bwd = Ready::new(upstream_ready(true, o_bwd.ready, occupied));

        let state_next = match transition(occupied, i_fwd.valid, i_bwd.ready, o_bwd.ready) {
            Transition::Admit => StageState::Occupied(self.transform.apply(i_fwd.inner.clone())),
            Transition::Drain => StageState::Empty,
            Transition::Hold => state.clone(),
        };

        (self.output(state), i_bwd, state_next)
    }

    fn reset_fwd(&self, _i_fwd: &Valid<AxisValue>, _o_bwd: &Ready, state: &StageState) -> Valid<AxisValue> {
        self.output(state)
    }

    fn observe(&self, step: &Step<AxisChannel, AxisChannel>) { log_transfers(self.module_name(), step) }
}

/// Logs the handshakes a stage completed at its ports in a committed cycle.
pub(crate) fn log_transfers(module: &str, step: &Step<AxisChannel, AxisChannel>) {
    if !step.resetn {
        return;
    }

    let drained = is_transfer(&step.o_fwd, &step.o_bwd);
    if is_transfer(&step.i_fwd, &step.i_bwd) {
        debug!(module = module, cycle = step.cycle, drained, "admit");
    } else if drained {
        debug!(module = module, cycle = step.cycle, "drain");
    }
}
