//! Chains of elastic register stages.

use std::fmt;

use crate::*;

/// Stages wired one after another: stage `k`'s downstream port drives stage `k + 1`'s upstream port.
///
/// Every stage keeps its own state and the stages only see each other's `Valid` and `Ready` signals. A cycle
/// resolves ready signals from the last stage backwards, then commits every stage at once.
pub struct Pipeline<T = Invert> {
    stages: Vec<SkidBuffer<T>>,
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stages).finish()
    }
}

impl<T: Transform> Pipeline<T> {
    /// Chains `stages`. Adjacent stages must have identical port shapes.
    pub fn new(stages: Vec<SkidBuffer<T>>) -> Result<Self, StageError> {
        if stages.is_empty() {
            return Err(StageError::EmptyPipeline);
        }

        for pair in stages.windows(2) {
            let (upstream, downstream) = (pair[0].config(), pair[1].config());
            if let Some(mismatch) = upstream.channel_typ().first_mismatch(&downstream.channel_typ()) {
                return Err(StageError::WidthMismatch {
                    port: mismatch.name,
                    upstream: mismatch.left,
                    downstream: mismatch.right,
                });
            }
        }

        Ok(Self { stages })
    }

    /// Chains `depth` stages of the same shape, creating each stage's transform with `transform`.
    pub fn uniform<F: FnMut() -> T>(depth: usize, config: AxisConfig, mut transform: F) -> Result<Self, StageError> {
        Self::new((0..depth).map(|_| SkidBuffer::symmetric(config, transform())).collect::<Result<Vec<_>, _>>()?)
    }
}

impl<T: Transform> Fsm for Pipeline<T> {
    type I = AxisChannel;
    type O = AxisChannel;
    type S = Vec<StageState>;

    fn module_name(&self) -> &str { "pipeline" }

    fn init(&self) -> Vec<StageState> { self.stages.iter().map(|stage| stage.init()).collect() }

    fn logic(
        &self, i_fwd: &Valid<AxisValue>, o_bwd: &Ready, state: &Vec<StageState>,
    ) -> (Valid<AxisValue>, Ready, Vec<StageState>) {
        let last = self.stages.len() - 1;
        let o_fwd = self.stages[last].output(&state[last]);

        // A stage's forward output only depends on its own state, so each stage can be evaluated as soon as the
        // ready signal from its successor is known.
        let mut bwd = *o_bwd;
        let mut state_next = Vec::with_capacity(self.stages.len());
        for (k, stage) in self.stages.iter().enumerate().rev() {
            let fwd = if k == 0 { i_fwd.clone() } else { self.stages[k - 1].output(&state[k - 1]) };
            let (_, stage_bwd, stage_next) = stage.logic(&fwd, &bwd, &state[k]);
            bwd = stage_bwd;
            state_next.push(stage_next);
        }
        state_next.reverse();

        (o_fwd, bwd, state_next)
    }

    fn reset_fwd(&self, _i_fwd: &Valid<AxisValue>, _o_bwd: &Ready, state: &Vec<StageState>) -> Valid<AxisValue> {
        let last = self.stages.len() - 1;
        self.stages[last].output(&state[last])
    }

    fn observe(&self, step: &Step<AxisChannel, AxisChannel>) { log_transfers(self.module_name(), step) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AxisConfig { AxisConfig::new(8).user_width(2) }

    fn txn(data: u64) -> AxisValue { config().blank().with(Field::Data, Bits::from_u64(8, data)) }

    #[test]
    fn empty_pipeline_is_rejected() {
        assert_eq!(Pipeline::<Identity>::new(vec![]).unwrap_err(), StageError::EmptyPipeline);
        assert_eq!(Pipeline::uniform(0, config(), || Identity).unwrap_err(), StageError::EmptyPipeline);
    }

    #[test]
    fn adjacent_stages_must_agree() {
        let stages = vec![
            SkidBuffer::symmetric(config(), Identity).unwrap(),
            SkidBuffer::symmetric(config().dest_width(4), Identity).unwrap(),
        ];
        assert_eq!(
            Pipeline::new(stages).unwrap_err(),
            StageError::WidthMismatch { port: "tdest".to_string(), upstream: 8, downstream: 4 }
        );
    }

    #[test]
    fn latency_equals_depth() {
        let mut sim = Sim::new(Pipeline::uniform(3, config(), || Identity).unwrap());

        let mut arrivals = vec![];
        for cycle in 0..6 {
            let i_fwd = if cycle == 0 { Valid::valid(txn(0x5a)) } else { Valid::invalid(config().blank()) };
            let step = sim.tick(i_fwd, Ready::new(true));
            if let Some(value) = step.o_fwd.transfer(&step.o_bwd) {
                arrivals.push((cycle, value.clone()));
            }
        }
        assert_eq!(arrivals, vec![(3, txn(0x5a))]);
    }

    #[test]
    fn full_pipeline_streams_one_transfer_per_cycle() {
        let mut sim = Sim::new(Pipeline::uniform(2, config(), Invert::default).unwrap());

        let mut received = vec![];
        for cycle in 0..12u64 {
            let step = sim.tick(Valid::valid(txn(cycle)), Ready::new(true));
            assert!(step.i_bwd.ready);
            if let Some(value) = step.o_fwd.transfer(&step.o_bwd) {
                received.push(value.tdata.to_u128());
            }
        }
        // Each of the two stages inverts TDATA, so values come out unchanged, two cycles late.
        assert_eq!(received, (0..10).map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn backpressure_fills_every_stage_before_stalling_upstream() {
        let mut sim = Sim::new(Pipeline::uniform(3, config(), || Identity).unwrap());

        let mut accepted = 0;
        for cycle in 0..5u64 {
            let step = sim.tick(Valid::valid(txn(cycle)), Ready::new(false));
            if step.i_fwd.transfer(&step.i_bwd).is_some() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);
        assert!(sim.state().iter().all(StageState::is_occupied));

        let step = sim.tick(Valid::invalid(config().blank()), Ready::new(true));
        assert_eq!(step.o_fwd.transfer(&step.o_bwd), Some(&txn(0)));
    }

    #[test]
    fn reset_empties_every_stage() {
        let mut sim = Sim::new(Pipeline::uniform(2, config(), || Identity).unwrap());
        sim.tick(Valid::valid(txn(1)), Ready::new(false));
        sim.tick(Valid::valid(txn(2)), Ready::new(false));
        assert!(sim.state().iter().all(StageState::is_occupied));

        sim.set_resetn(false);
        let step = sim.tick(Valid::valid(txn(3)), Ready::new(false));
        assert!(!step.i_bwd.ready);
        assert_eq!(step.o_fwd, Valid::valid(txn(1)));
        assert!(sim.state().iter().all(|state| !state.is_occupied()));
    }
}
