//! AXI4-Stream inverter: complements TDATA and TUSER while passing through skid buffers.

use skidflow_std::*;

/// Chain of `depth` inverting skid buffers.
pub fn m(config: AxisConfig, depth: usize) -> Result<Pipeline, StageError> {
    Pipeline::uniform(depth, config, Invert::default)
}

/// What a chain of `depth` inverters does to a transaction.
pub fn expected(depth: usize) -> Invert {
    if depth % 2 == 1 {
        Invert::default()
    } else {
        Invert::new([])
    }
}
