//! Wires the drivers, the monitor and the scoreboard around a module under test.

use tracing::{debug, info};

use crate::*;

/// Cycles simulated after the last expected packet arrived, so that surplus output still surfaces.
pub const SETTLE_CYCLES: u64 = 16;

/// Testbench for a module with one AXI4-Stream input and one AXI4-Stream output.
///
/// Every cycle the master and the slave drive the module's ports, the module is ticked, and then the drivers and
/// the monitor observe what the module drove back. Received packets go straight to the scoreboard.
#[derive(Debug)]
pub struct Testbench<M: Fsm<I = AxisChannel, O = AxisChannel>> {
    sim: Sim<M>,
    master: AxisMaster,
    slave: AxisSlave,
    monitor: AxisMonitor,
    scoreboard: Scoreboard,
}

impl<M: Fsm<I = AxisChannel, O = AxisChannel>> Testbench<M> {
    /// Creates a testbench. The master drives ports of shape `config`.
    pub fn new(dut: M, config: AxisConfig, slave: AxisSlave, monitor: AxisMonitor) -> Self {
        Self { sim: Sim::new(dut), master: AxisMaster::new(config), slave, monitor, scoreboard: Scoreboard::new() }
    }

    /// Simulator of the module under test.
    pub fn sim(&self) -> &Sim<M> { &self.sim }

    /// Master driving the module's input.
    pub fn master_mut(&mut self) -> &mut AxisMaster { &mut self.master }

    /// Scoreboard checking the module's output.
    pub fn scoreboard_mut(&mut self) -> &mut Scoreboard { &mut self.scoreboard }

    /// Holds reset low for `cycles` cycles, then releases it and waits for as long again.
    pub fn reset(&mut self, cycles: usize) -> Result<(), TbError> {
        self.sim.set_resetn(false);
        for _ in 0..cycles {
            self.step()?;
        }
        self.sim.set_resetn(true);
        for _ in 0..cycles {
            self.step()?;
        }
        debug!(module = self.sim.module().module_name(), cycle = self.sim.cycle(), "reset released");
        Ok(())
    }

    /// Simulates one cycle.
    pub fn step(&mut self) -> Result<(), TbError> {
        let step = self.sim.tick(self.master.fwd(), self.slave.bwd());

        self.master.commit(&step.i_bwd);
        self.slave.commit(&step.o_fwd);
        if let Some(packet) = self.monitor.sample(&step.o_fwd, &step.o_bwd) {
            self.scoreboard.check(step.cycle, packet)?;
        }
        Ok(())
    }

    /// Runs until every expected packet has been received, giving up after `max_cycles` cycles. Then keeps the
    /// module running for `SETTLE_CYCLES` cycles with nothing more expected.
    ///
    /// Returns the number of cycles it took to receive every packet.
    pub fn run(&mut self, max_cycles: u64) -> Result<u64, TbError> {
        let start = self.sim.cycle();
        while self.scoreboard.remaining() > 0 || !self.master.is_idle() {
            let cycles = self.sim.cycle() - start;
            if cycles >= max_cycles {
                return Err(TbError::Timeout { cycles, remaining: self.scoreboard.remaining() });
            }
            self.step()?;
        }

        let cycles = self.sim.cycle() - start;
        for _ in 0..SETTLE_CYCLES {
            self.step()?;
        }
        if !self.monitor.partial().is_empty() {
            return Err(TbError::Unexpected {
                cycle: self.sim.cycle(),
                got: format!("{} words of an unterminated packet", self.monitor.partial().len()),
            });
        }

        info!(
            module = self.sim.module().module_name(),
            cycles,
            packets = self.scoreboard.matched(),
            words = self.master.sent(),
            transfers = self.monitor.transfers(),
            "all packets received"
        );
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AxisConfig { AxisConfig::new(8).user_width(2).dest_width(1).id_width(1) }

    fn testbench(slave: AxisSlave, monitor: AxisMonitor) -> Testbench<SkidBuffer> {
        Testbench::new(SkidBuffer::inverter(config()).unwrap(), config(), slave, monitor)
    }

    /// Inverter that sends every TLAST word twice.
    #[derive(Debug)]
    struct RepeatLast(SkidBuffer);

    impl Fsm for RepeatLast {
        type I = AxisChannel;
        type O = AxisChannel;
        type S = (StageState, bool);

        fn module_name(&self) -> &str { "repeat_last" }

        fn init(&self) -> (StageState, bool) { (StageState::Empty, false) }

        fn logic(
            &self, i_fwd: &Valid<AxisValue>, o_bwd: &Ready, (state, sent_once): &(StageState, bool),
        ) -> (Valid<AxisValue>, Ready, (StageState, bool)) {
            let o_fwd = self.0.output(state);
            if o_fwd.valid && o_fwd.inner.tlast && !sent_once {
                return (o_fwd, Ready::new(false), (state.clone(), o_bwd.ready));
            }

            let (o_fwd, i_bwd, state_next) = self.0.logic(i_fwd, o_bwd, state);
            let sent_once = *sent_once && &state_next == state;
            (o_fwd, i_bwd, (state_next, sent_once))
        }
    }

    fn words(data: &[u64]) -> Vec<Bits> { data.iter().map(|data| Bits::from_u64(8, *data)).collect() }

    #[test]
    fn reset_holds_the_master() {
        let mut tb = testbench(AxisSlave::always_ready(), AxisMonitor::new(true, false));
        tb.master_mut().write([Bits::from_u64(8, 0x0f)], true).unwrap();

        tb.sim.set_resetn(false);
        tb.step().unwrap();
        tb.step().unwrap();
        assert_eq!(tb.master.pending(), 1);

        tb.sim.set_resetn(true);
        tb.scoreboard_mut().expect(vec![Observed::Data(Bits::from_u64(8, 0xf0))]);
        assert_eq!(tb.run(10).unwrap(), 2);
        assert!(!tb.sim().state().is_occupied());
    }

    #[test]
    fn surplus_output_is_an_error() {
        let mut tb = testbench(AxisSlave::always_ready(), AxisMonitor::new(false, false));
        tb.master_mut().write([Bits::from_u64(8, 1)], true).unwrap();

        tb.step().unwrap();
        let err = tb.step().unwrap_err();
        assert!(matches!(err, TbError::Unexpected { cycle: 1, .. }));
    }

    #[test]
    fn repeated_last_word_is_an_error() {
        let dut = RepeatLast(SkidBuffer::inverter(config()).unwrap());
        let mut tb = Testbench::new(dut, config(), AxisSlave::always_ready(), AxisMonitor::new(true, false));
        tb.master_mut().write(words(&[1, 2, 3]), true).unwrap();
        tb.scoreboard_mut().expect(words(&[1, 2, 3]).into_iter().map(|word| Observed::Data(!word)).collect());

        let err = tb.run(100).unwrap_err();
        assert!(matches!(err, TbError::Unexpected { .. }), "{err}");
        assert_eq!(tb.scoreboard.matched(), 1);
    }

    #[test]
    fn trailing_words_without_tlast_are_an_error() {
        let mut tb = testbench(AxisSlave::always_ready(), AxisMonitor::new(true, false));
        tb.master_mut().write(words(&[1, 2]), true).unwrap();
        tb.master_mut().write([Word::from(Bits::from_u64(8, 3)).tlast(false)], false).unwrap();
        tb.scoreboard_mut().expect(words(&[1, 2]).into_iter().map(|word| Observed::Data(!word)).collect());

        let err = tb.run(100).unwrap_err();
        assert!(matches!(err, TbError::Unexpected { .. }), "{err}");
    }

    #[test]
    fn gives_up_on_a_stalled_consumer() {
        let slave = AxisSlave::new(ReadyDelay::After(Cycles::Fixed(100)), Cycles::Fixed(0), 0);
        let mut tb = testbench(slave, AxisMonitor::new(true, false));
        tb.master_mut().write([Bits::from_u64(8, 1), Bits::from_u64(8, 2)], true).unwrap();
        tb.scoreboard_mut().expect(vec![Observed::Data(!Bits::from_u64(8, 1)), Observed::Data(!Bits::from_u64(8, 2))]);

        let err = tb.run(20).unwrap_err();
        assert_eq!(err, TbError::Timeout { cycles: 20, remaining: 1 });
        assert_eq!(tb.master.pending(), 1);
    }
}
