use std::fmt::Debug;

use crate::hir::*;
use crate::lir;

/// Interface of channels.
///
/// A channel carries forward signals from producer to consumer and backward signals from consumer to producer.
/// Both directions are decided from current-cycle information only.
pub trait Interface: 'static + Sized + Debug {
    /// Forward signals.
    type Fwd: Signal;

    /// Backward signals.
    ///
    /// `Default` is the deasserted value. A module drives it on its input side while held in reset.
    type Bwd: Signal + Default;

    /// Returns the channel type of the given pair of signals.
    fn channel_typ(fwd: &Self::Fwd, bwd: &Self::Bwd) -> lir::ChannelTyp {
        lir::ChannelTyp::new(fwd.port_decls(), bwd.port_decls())
    }
}
