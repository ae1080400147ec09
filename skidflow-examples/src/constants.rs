//! Constants for the example modules.

// Constants for `axis_inverter`.
pub mod axis_inverter {
    pub const DATA_WIDTH: usize = 32;
    pub const DEST_WIDTH: usize = 8;
    pub const ID_WIDTH: usize = 8;
    pub const USER_WIDTH: usize = 8;
    pub const DEPTH: usize = 1;
}

// Constants for the regression run.
pub mod regression {
    pub const PACKETS: usize = 5;
    pub const PACKET_SIZE_MIN: usize = 10;
    pub const PACKET_SIZE_MAX: usize = 100;
    pub const MAX_CYCLES: u64 = 100_000;
}
