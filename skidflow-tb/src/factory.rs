//! Ready-made randomized tests for modules with an AXI4-Stream input and output.
//!
//! Every test sends random packets through the module under test and checks, packet by packet, that what comes out
//! is what went in with the expected transform applied. [`matrix`] lists the slave ready patterns the tests are
//! meant to be run under.

use std::ops::RangeInclusive;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::*;

/// Options of a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOptions {
    /// Number of packets sent.
    pub packets: usize,

    /// Number of words in a packet, drawn for every packet.
    pub packet_size: RangeInclusive<usize>,

    /// When the slave raises TREADY.
    pub delay: ReadyDelay,

    /// How many transfers the slave accepts in a row. 0 means unlimited.
    pub consecutive: Cycles,

    /// Seed of every random choice the test makes.
    pub seed: u64,

    /// Cycle budget after reset.
    pub max_cycles: u64,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            packets: 5,
            packet_size: 10..=100,
            delay: ReadyDelay::Always,
            consecutive: Cycles::Fixed(0),
            seed: 0,
            max_cycles: 100_000,
        }
    }
}

/// Outcome of a passed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Packets received.
    pub packets: usize,

    /// Words sent.
    pub words: usize,

    /// Cycles from the end of reset until the last packet was received.
    pub cycles: u64,
}

/// `base` under every combination of ready delay {0, 1, random 2..=10} and consecutive transfers
/// {unlimited, 1, 5, random 1..=5}. Each combination gets its own seed.
pub fn matrix(base: &TestOptions) -> Vec<TestOptions> {
    let delays = [Cycles::Fixed(0), Cycles::Fixed(1), Cycles::Random(2..=10)];
    let consecutive = [Cycles::Fixed(0), Cycles::Fixed(1), Cycles::Fixed(5), Cycles::Random(1..=5)];

    delays
        .into_iter()
        .cartesian_product(consecutive)
        .enumerate()
        .map(|(i, (delay, consecutive))| TestOptions {
            delay: ReadyDelay::After(delay),
            consecutive,
            seed: base.seed.wrapping_add(i as u64),
            ..base.clone()
        })
        .collect()
}

/// Random bit vector.
pub fn random_bits<R: Rng>(rng: &mut R, width: usize) -> Bits { Bits::from_fn(width, |_| rng.gen()) }

/// Sends random TDATA words and checks the TDATA of every received word.
pub fn test_tdata<M, T>(dut: M, config: AxisConfig, expected: &T, options: &TestOptions) -> Result<Report, TbError>
where
    M: Fsm<I = AxisChannel, O = AxisChannel>,
    T: Transform,
{
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut packets: Vec<Vec<Word>> = Vec::with_capacity(options.packets);
    for _ in 0..options.packets {
        let size = rng.gen_range(options.packet_size.clone());
        packets.push((0..size).map(|_| Word::from(random_bits(&mut rng, config.width(Field::Data)))).collect());
    }

    run("tdata", dut, config, &mut rng, packets, false, expected, options)
}

/// Sends packets that exercise every signal and checks whole received transactions.
///
/// The first word of a packet sets every signal (TKEEP all ones), the second one sets TDATA and TSTRB (all ones),
/// and the rest only TDATA, so later words carry the earlier words' signals.
pub fn test_aux<M, T>(dut: M, config: AxisConfig, expected: &T, options: &TestOptions) -> Result<Report, TbError>
where
    M: Fsm<I = AxisChannel, O = AxisChannel>,
    T: Transform,
{
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut packets = Vec::with_capacity(options.packets);
    for _ in 0..options.packets {
        let first = Field::ALL
            .iter()
            .fold(Word::default(), |word, field| word.set(*field, random_bits(&mut rng, config.width(*field))))
            .set(Field::Keep, Bits::ones(config.width(Field::Keep)));
        let second = Word::default()
            .set(Field::Data, random_bits(&mut rng, config.width(Field::Data)))
            .set(Field::Strb, Bits::ones(config.width(Field::Strb)));

        let size = rng.gen_range(options.packet_size.clone());
        let mut packet = vec![first, second];
        packet.extend((0..size).map(|_| Word::from(random_bits(&mut rng, config.width(Field::Data)))));
        packets.push(packet);
    }

    run("aux", dut, config, &mut rng, packets, true, expected, options)
}

#[allow(clippy::too_many_arguments)]
fn run<M, T>(
    name: &str, dut: M, config: AxisConfig, rng: &mut StdRng, packets: Vec<Vec<Word>>, aux_signals: bool,
    expected: &T, options: &TestOptions,
) -> Result<Report, TbError>
where
    M: Fsm<I = AxisChannel, O = AxisChannel>,
    T: Transform,
{
    let slave = AxisSlave::new(options.delay.clone(), options.consecutive.clone(), rng.gen());
    let mut tb = Testbench::new(dut, config, slave, AxisMonitor::new(true, aux_signals));
    tb.reset(2)?;

    let mut words = 0;
    for packet in packets {
        let values = tb.master_mut().write(packet, true)?;
        words += values.len();

        let outputs = values.into_iter().map(|value| expected.apply(value));
        let outputs = if aux_signals {
            outputs.map(Observed::Value).collect()
        } else {
            outputs.map(|value| Observed::Data(value.tdata)).collect()
        };
        tb.scoreboard_mut().expect(outputs);
    }

    let cycles = tb.run(options.max_cycles)?;
    let report = Report { packets: options.packets, words, cycles };
    info!(
        test = name,
        module = tb.sim().module().module_name(),
        delay = ?options.delay,
        consecutive = ?options.consecutive,
        words,
        cycles,
        "passed"
    );
    Ok(report)
}
