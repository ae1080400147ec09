//! In-order comparison of received packets against expected ones.

use std::collections::VecDeque;

use itertools::{EitherOrBoth, Itertools};
use tracing::warn;

use crate::*;

/// Scoreboard for one interface.
#[derive(Debug, Default)]
pub struct Scoreboard {
    expected: VecDeque<Packet>,
    matched: usize,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self { Self::default() }

    /// Appends a packet to the expected queue.
    pub fn expect(&mut self, packet: Packet) { self.expected.push_back(packet); }

    /// Compares a received packet against the oldest expected one.
    pub fn check(&mut self, cycle: u64, got: Packet) -> Result<(), TbError> {
        let expected = self.expected.pop_front().ok_or_else(|| TbError::Unexpected {
            cycle,
            got: format!("[{}]", got.iter().join(", ")),
        })?;

        let mismatch = expected.iter().zip_longest(got.iter()).enumerate().find_map(|(index, pair)| match pair {
            EitherOrBoth::Both(expected, got) if expected == got => None,
            EitherOrBoth::Both(expected, got) => Some((index, expected.to_string(), got.to_string())),
            EitherOrBoth::Left(expected) => Some((index, expected.to_string(), "end of packet".to_string())),
            EitherOrBoth::Right(got) => Some((index, "end of packet".to_string(), got.to_string())),
        });

        if let Some((index, expected, got)) = mismatch {
            warn!(cycle, index, %expected, %got, "scoreboard mismatch");
            return Err(TbError::Mismatch { cycle, index, expected, got });
        }

        self.matched += 1;
        Ok(())
    }

    /// Number of expected packets not received yet.
    pub fn remaining(&self) -> usize { self.expected.len() }

    /// Number of packets received as expected.
    pub fn matched(&self) -> usize { self.matched }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(words: &[u64]) -> Packet { words.iter().map(|word| Observed::Data(Bits::from_u64(8, *word))).collect() }

    #[test]
    fn matches_in_order() {
        let mut scoreboard = Scoreboard::new();
        scoreboard.expect(packet(&[1, 2]));
        scoreboard.expect(packet(&[3]));

        scoreboard.check(4, packet(&[1, 2])).unwrap();
        assert_eq!(scoreboard.remaining(), 1);
        scoreboard.check(5, packet(&[3])).unwrap();
        assert_eq!(scoreboard.matched(), 2);
    }

    #[test]
    fn reports_first_difference() {
        let mut scoreboard = Scoreboard::new();
        scoreboard.expect(packet(&[1, 2, 3]));

        let err = scoreboard.check(9, packet(&[1, 4, 3])).unwrap_err();
        assert_eq!(err, TbError::Mismatch {
            cycle: 9,
            index: 1,
            expected: "8'h02".to_string(),
            got: "8'h04".to_string()
        });
    }

    #[test]
    fn short_and_surplus_packets() {
        let mut scoreboard = Scoreboard::new();
        scoreboard.expect(packet(&[1, 2]));

        let err = scoreboard.check(3, packet(&[1])).unwrap_err();
        assert!(matches!(err, TbError::Mismatch { index: 1, .. }));

        let err = scoreboard.check(4, packet(&[1])).unwrap_err();
        assert!(matches!(err, TbError::Unexpected { cycle: 4, .. }));
    }
}
