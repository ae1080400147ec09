use std::fmt;
use std::ops::Not;

use crate::*;

/// Bit-representable values.
///
/// Widths are carried by values rather than by types: two values of the same Rust type may have different port
/// shapes. Compare `port_decls()` to check that they agree.
pub trait Signal: 'static + fmt::Debug + Clone {
    /// Port names and bitwidths.
    ///
    /// # Example
    ///
    /// Port declarations of `Valid<AxisValue>` are as follows:
    ///
    /// ```ignore
    /// Struct([
    ///     (None, Struct([(Some("tdata"), Bits(32)), (Some("tstrb"), Bits(4)), ..., (Some("tlast"), Bits(1))])),
    ///     (Some("valid"), Bits(1)),
    /// ])
    /// ```
    fn port_decls(&self) -> lir::PortDecls;

    /// Flattens the value into bits, in member order and LSB first.
    fn transl(&self) -> Vec<bool>;

    /// Signal's bit width.
    fn width(&self) -> usize { self.port_decls().width() }
}

impl Signal for bool {
    fn port_decls(&self) -> lir::PortDecls { lir::PortDecls::Bits(1) }

    fn transl(&self) -> Vec<bool> { vec![*self] }
}

/// Bit vector whose width is fixed at construction. Index 0 is the LSB.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Bits {
    inner: Vec<bool>,
}

impl Bits {
    /// Creates new bits from LSB-first booleans.
    pub fn new(inner: Vec<bool>) -> Self { Self { inner } }

    /// All-zero bits.
    pub fn zero(width: usize) -> Self { Self::new(vec![false; width]) }

    /// All-one bits.
    pub fn ones(width: usize) -> Self { Self::new(vec![true; width]) }

    /// Creates bits by evaluating `f` on every bit index.
    pub fn from_fn<F: FnMut(usize) -> bool>(width: usize, f: F) -> Self { (0..width).map(f).collect() }

    /// Truncates (or zero-extends) `value` into `width` bits.
    pub fn from_u64(width: usize, value: u64) -> Self { Self::from_fn(width, |i| i < 64 && (value >> i) & 1 == 1) }

    /// Width in bits.
    pub fn width(&self) -> usize { self.inner.len() }

    /// Iterates bits, LSB first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ { self.inner.iter().copied() }

    /// Whether every bit is set.
    pub fn all(&self) -> bool { self.inner.iter().all(|b| *b) }

    /// Returns the value as an integer, or `None` if a set bit does not fit in 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        self.inner.iter().enumerate().filter(|(_, b)| **b).try_fold(0u128, |acc, (i, _)| {
            if i < 128 {
                Some(acc | (1u128 << i))
            } else {
                None
            }
        })
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self { Self::new(iter.into_iter().collect()) }
}

impl From<Vec<bool>> for Bits {
    fn from(inner: Vec<bool>) -> Self { Self::new(inner) }
}

impl<const N: usize> From<[bool; N]> for Bits {
    fn from(inner: [bool; N]) -> Self { Self::new(inner.to_vec()) }
}

impl Not for Bits {
    type Output = Bits;

    fn not(self) -> Bits { self.inner.into_iter().map(|b| !b).collect() }
}

impl Not for &Bits {
    type Output = Bits;

    fn not(self) -> Bits { self.iter().map(|b| !b).collect() }
}

impl fmt::Display for Bits {
    /// Formats as a Verilog-style sized hex literal, e.g. `12'h5a3`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let nibbles = self
            .inner
            .chunks(4)
            .map(|chunk| chunk.iter().enumerate().fold(0u32, |acc, (i, b)| if *b { acc | (1u32 << i) } else { acc }))
            .collect::<Vec<_>>();

        write!(f, "{}'h", self.width())?;
        if nibbles.is_empty() {
            return write!(f, "0");
        }
        for nibble in nibbles.into_iter().rev() {
            write!(f, "{:x}", nibble)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::Display::fmt(self, f) }
}

impl Signal for Bits {
    fn port_decls(&self) -> lir::PortDecls { lir::PortDecls::Bits(self.width()) }

    fn transl(&self) -> Vec<bool> { self.inner.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversions_truncate() {
        let bits = Bits::from_u64(4, 0x1f);
        assert_eq!(bits.width(), 4);
        assert_eq!(bits.to_u128(), Some(0xf));
        assert_eq!(Bits::from_u64(8, 0xa5).to_u128(), Some(0xa5));
        assert_eq!(Bits::from_u64(80, u64::MAX).to_u128(), Some(u128::from(u64::MAX)));
    }

    #[test]
    fn wide_values_do_not_fit_u128() {
        let mut inner = vec![false; 512];
        inner[300] = true;
        assert_eq!(Bits::new(inner).to_u128(), None);
        assert_eq!(Bits::zero(512).to_u128(), Some(0));
    }

    #[test]
    fn complement_flips_every_bit() {
        let bits = Bits::from_u64(12, 0x5a3);
        assert_eq!((!&bits).to_u128(), Some(0xa5c));
        assert_eq!(!!bits.clone(), bits);
        assert!((!Bits::zero(7)).all());
    }

    #[test]
    fn display_is_sized_hex() {
        assert_eq!(Bits::from_u64(12, 0x5a3).to_string(), "12'h5a3");
        assert_eq!(Bits::from_u64(5, 0x11).to_string(), "5'h11");
        assert_eq!(Bits::zero(0).to_string(), "0'h0");
    }

    #[test]
    fn transl_matches_port_width() {
        let bits = Bits::from([true, false, true]);
        assert_eq!(bits.transl(), vec![true, false, true]);
        assert_eq!(bits.port_decls(), lir::PortDecls::Bits(3));
        assert_eq!(true.width(), 1);
        assert_eq!(().width(), 0);
    }
}
