//! AXI4 interface.
//!
//! See [Xilinx PG085](https://www.xilinx.com/support/documentation/ip_documentation/axis_infrastructure_ip_suite/v1_1/pg085-axi4stream-infrastructure.pdf) for more details.

use std::fmt;

use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::*;

/// AXI4-Stream transaction.
///
/// A transaction is a value: it is moved or cloned as a whole and never aliased field by field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Signal)]
pub struct AxisValue {
    /// AXI4-Stream TDATA
    pub tdata: Bits,

    /// AXI4-Stream TSTRB, one bit per byte lane of TDATA
    pub tstrb: Bits,

    /// AXI4-Stream TKEEP, one bit per byte lane of TDATA
    pub tkeep: Bits,

    /// AXI4-Stream TDEST
    pub tdest: Bits,

    /// AXI4-Stream TID
    pub tid: Bits,

    /// AXI4-Stream TUSER
    pub tuser: Bits,

    /// AXI4-Stream TLAST
    pub tlast: bool,
}

assert_impl_all!(AxisValue: Send, Sync, Clone, Signal);

/// AXI4-Stream channel.
pub type AxisChannel = VrChannel<AxisValue>;

/// Bit-vector fields of [`AxisValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// TDATA
    Data,
    /// TSTRB
    Strb,
    /// TKEEP
    Keep,
    /// TDEST
    Dest,
    /// TID
    Id,
    /// TUSER
    User,
}

impl Field {
    /// All fields, in port order.
    pub const ALL: [Field; 6] = [Field::Data, Field::Strb, Field::Keep, Field::Dest, Field::Id, Field::User];

    /// Port name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::Data => "tdata",
            Field::Strb => "tstrb",
            Field::Keep => "tkeep",
            Field::Dest => "tdest",
            Field::Id => "tid",
            Field::User => "tuser",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

impl AxisValue {
    /// Returns the given field.
    pub fn field(&self, field: Field) -> &Bits {
        match field {
            Field::Data => &self.tdata,
            Field::Strb => &self.tstrb,
            Field::Keep => &self.tkeep,
            Field::Dest => &self.tdest,
            Field::Id => &self.tid,
            Field::User => &self.tuser,
        }
    }

    /// Returns the given field mutably.
    pub fn field_mut(&mut self, field: Field) -> &mut Bits {
        match field {
            Field::Data => &mut self.tdata,
            Field::Strb => &mut self.tstrb,
            Field::Keep => &mut self.tkeep,
            Field::Dest => &mut self.tdest,
            Field::Id => &mut self.tid,
            Field::User => &mut self.tuser,
        }
    }

    /// Replaces the given field, returning the updated value.
    #[must_use]
    pub fn with(mut self, field: Field, bits: Bits) -> Self {
        *self.field_mut(field) = bits;
        self
    }

    /// Sets TLAST, returning the updated value.
    #[must_use]
    pub fn with_tlast(mut self, tlast: bool) -> Self {
        self.tlast = tlast;
        self
    }
}

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("data width must be a positive multiple of 8, got {0}")]
    DataWidth(usize),
    #[error("{field} width must be positive")]
    ZeroWidth { field: Field },
}

/// Widths of an AXI4-Stream port.
///
/// TSTRB and TKEEP are derived: one bit per byte lane of TDATA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisConfig {
    data_width: usize,
    user_width: usize,
    dest_width: usize,
    id_width: usize,
}

impl Default for AxisConfig {
    fn default() -> Self { Self::new(32) }
}

impl AxisConfig {
    /// Creates a port with the given TDATA width and 8-bit TUSER, TDEST and TID.
    pub const fn new(data_width: usize) -> Self { Self { data_width, user_width: 8, dest_width: 8, id_width: 8 } }

    /// Sets TUSER width.
    #[must_use]
    pub const fn user_width(mut self, width: usize) -> Self {
        self.user_width = width;
        self
    }

    /// Sets TDEST width.
    #[must_use]
    pub const fn dest_width(mut self, width: usize) -> Self {
        self.dest_width = width;
        self
    }

    /// Sets TID width.
    #[must_use]
    pub const fn id_width(mut self, width: usize) -> Self {
        self.id_width = width;
        self
    }

    /// Width of the given field.
    pub const fn width(&self, field: Field) -> usize {
        match field {
            Field::Data => self.data_width,
            Field::Strb | Field::Keep => self.data_width / 8,
            Field::Dest => self.dest_width,
            Field::Id => self.id_width,
            Field::User => self.user_width,
        }
    }

    /// Checks that every width is positive and that TDATA is byte aligned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_width == 0 || self.data_width % 8 != 0 {
            return Err(ConfigError::DataWidth(self.data_width));
        }
        for field in [Field::Dest, Field::Id, Field::User] {
            if self.width(field) == 0 {
                return Err(ConfigError::ZeroWidth { field });
            }
        }
        Ok(())
    }

    /// All-zero value of this shape.
    pub fn blank(&self) -> AxisValue {
        AxisValue {
            tdata: Bits::zero(self.width(Field::Data)),
            tstrb: Bits::zero(self.width(Field::Strb)),
            tkeep: Bits::zero(self.width(Field::Keep)),
            tdest: Bits::zero(self.width(Field::Dest)),
            tid: Bits::zero(self.width(Field::Id)),
            tuser: Bits::zero(self.width(Field::User)),
            tlast: false,
        }
    }

    /// Port declarations of a transaction of this shape.
    pub fn port_decls(&self) -> lir::PortDecls { self.blank().port_decls() }

    /// Channel type of a port of this shape.
    pub fn channel_typ(&self) -> lir::ChannelTyp {
        AxisChannel::channel_typ(&Valid::invalid(self.blank()), &Ready::default())
    }
}
