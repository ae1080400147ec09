//! AXI4-Stream monitor.

use std::fmt;

use crate::*;

/// What the monitor records for one transfer.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Observed {
    /// TDATA only.
    Data(Bits),
    /// The whole transaction.
    Value(AxisValue),
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Observed::Data(tdata) => write!(f, "{tdata}"),
            Observed::Value(value) => write!(
                f,
                "{{tdata: {}, tstrb: {}, tkeep: {}, tdest: {}, tid: {}, tuser: {}, tlast: {}}}",
                value.tdata, value.tstrb, value.tkeep, value.tdest, value.tid, value.tuser, value.tlast
            ),
        }
    }
}

/// Transfers recorded by the monitor, in order. Without packet mode, every packet is a single word.
pub type Packet = Vec<Observed>;

/// AXI4-Stream monitor.
///
/// Samples a port every cycle and records the transfers that complete on it.
#[derive(Debug)]
pub struct AxisMonitor {
    packets: bool,
    aux_signals: bool,
    current: Packet,
    transfers: u64,
}

impl AxisMonitor {
    /// Creates a monitor.
    ///
    /// With `packets`, words are grouped until TLAST. With `aux_signals`, whole transactions are recorded instead of
    /// TDATA only.
    pub fn new(packets: bool, aux_signals: bool) -> Self {
        Self { packets, aux_signals, current: Vec::new(), transfers: 0 }
    }

    /// Samples the port for the current cycle, returning a packet once it is complete.
    pub fn sample(&mut self, fwd: &Valid<AxisValue>, bwd: &Ready) -> Option<Packet> {
        let value = fwd.transfer(bwd)?;
        self.transfers += 1;

        let observed =
            if self.aux_signals { Observed::Value(value.clone()) } else { Observed::Data(value.tdata.clone()) };
        self.current.push(observed);
        if self.packets && !value.tlast {
            return None;
        }
        Some(std::mem::take(&mut self.current))
    }

    /// Words of the packet being received.
    pub fn partial(&self) -> &[Observed] { &self.current }

    /// Number of transfers seen so far.
    pub fn transfers(&self) -> u64 { self.transfers }
}
