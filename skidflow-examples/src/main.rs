mod axis_inverter;
mod constants;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use skidflow_std::*;
use skidflow_tb::factory::{self, TestOptions};
use tracing::{error, info};

use crate::constants::{axis_inverter as defaults, regression};

/// Runs the randomized AXI4-Stream regression on a chain of inverting skid buffers.
#[derive(Debug, Parser)]
#[command(name = "skidflow-examples")]
#[command(version, about, long_about = None)]
struct Args {
    /// TDATA width in bits, a multiple of 8
    #[arg(long, default_value_t = defaults::DATA_WIDTH)]
    data_width: usize,

    /// TUSER width in bits
    #[arg(long, default_value_t = defaults::USER_WIDTH)]
    user_width: usize,

    /// TDEST width in bits
    #[arg(long, default_value_t = defaults::DEST_WIDTH)]
    dest_width: usize,

    /// TID width in bits
    #[arg(long, default_value_t = defaults::ID_WIDTH)]
    id_width: usize,

    /// Number of skid buffers in the chain
    #[arg(long, default_value_t = defaults::DEPTH)]
    depth: usize,

    /// Packets sent per test
    #[arg(long, default_value_t = regression::PACKETS)]
    packets: usize,

    /// Smallest packet, in words
    #[arg(long, default_value_t = regression::PACKET_SIZE_MIN)]
    min_size: usize,

    /// Largest packet, in words
    #[arg(long, default_value_t = regression::PACKET_SIZE_MAX)]
    max_size: usize,

    /// Seed of the first test; the others use the following seeds
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Cycle budget of a test
    #[arg(long, default_value_t = regression::MAX_CYCLES)]
    max_cycles: u64,

    /// Tests to run
    #[arg(long, value_enum, default_value_t = Test::All)]
    test: Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Test {
    Tdata,
    Aux,
    All,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = AxisConfig::new(args.data_width)
        .user_width(args.user_width)
        .dest_width(args.dest_width)
        .id_width(args.id_width);
    config.validate().context("invalid port widths")?;
    ensure!(args.min_size <= args.max_size, "--min-size must not exceed --max-size");

    let base = TestOptions {
        packets: args.packets,
        packet_size: args.min_size..=args.max_size,
        seed: args.seed,
        max_cycles: args.max_cycles,
        ..TestOptions::default()
    };
    let expected = axis_inverter::expected(args.depth);

    let mut failures = 0;
    let mut total = 0;
    for options in factory::matrix(&base) {
        if matches!(args.test, Test::Tdata | Test::All) {
            let dut = axis_inverter::m(config, args.depth)?;
            total += 1;
            if let Err(e) = factory::test_tdata(dut, config, &expected, &options) {
                error!(test = "tdata", options = ?options, error = %e, "failed");
                failures += 1;
            }
        }
        if matches!(args.test, Test::Aux | Test::All) {
            let dut = axis_inverter::m(config, args.depth)?;
            total += 1;
            if let Err(e) = factory::test_aux(dut, config, &expected, &options) {
                error!(test = "aux", options = ?options, error = %e, "failed");
                failures += 1;
            }
        }
    }

    ensure!(failures == 0, "{failures} of {total} tests failed");
    info!(total, "all tests passed");
    Ok(())
}
