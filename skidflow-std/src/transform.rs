//! Per-field transforms applied when a transaction is admitted into a stage.

use itertools::Itertools;

use crate::*;

/// Pure function from an admitted transaction to the transaction that is held and emitted.
///
/// A transform sees only the incoming value. It never observes what the stage previously held.
pub trait Transform {
    /// Applies the transform.
    fn apply(&self, value: AxisValue) -> AxisValue;
}

impl<F: Fn(AxisValue) -> AxisValue> Transform for F {
    fn apply(&self, value: AxisValue) -> AxisValue { self(value) }
}

/// Passes every field through, turning the stage into a plain register slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, value: AxisValue) -> AxisValue { value }
}

/// Replaces each selected field by its bitwise complement. Other fields pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invert {
    fields: Vec<Field>,
}

impl Default for Invert {
    /// Inverts TDATA and TUSER.
    fn default() -> Self { Self::new([Field::Data, Field::User]) }
}

impl Invert {
    /// Creates a transform inverting `fields`. Repeated fields are inverted once.
    pub fn new<I: IntoIterator<Item = Field>>(fields: I) -> Self {
        Self { fields: fields.into_iter().sorted().dedup().collect() }
    }
}

impl Transform for Invert {
    fn apply(&self, mut value: AxisValue) -> AxisValue {
        for field in &self.fields {
            let bits = value.field_mut(*field);
            *bits = !&*bits;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AxisValue {
        AxisConfig::new(16)
            .user_width(4)
            .blank()
            .with(Field::Data, Bits::from_u64(16, 0x1234))
            .with(Field::Strb, Bits::from_u64(2, 0b01))
            .with(Field::Keep, Bits::ones(2))
            .with(Field::Dest, Bits::from_u64(8, 0x42))
            .with(Field::Id, Bits::from_u64(8, 0x17))
            .with(Field::User, Bits::from_u64(4, 0b1010))
            .with_tlast(true)
    }

    #[test]
    fn default_inverts_data_and_user_only() {
        let input = sample();
        let output = Invert::default().apply(input.clone());

        assert_eq!(output.tdata.to_u128(), Some(0xedcb));
        assert_eq!(output.tuser.to_u128(), Some(0b0101));
        assert_eq!(output.tstrb, input.tstrb);
        assert_eq!(output.tkeep, input.tkeep);
        assert_eq!(output.tdest, input.tdest);
        assert_eq!(output.tid, input.tid);
        assert_eq!(output.tlast, input.tlast);
    }

    #[test]
    fn repeated_fields_are_inverted_once() {
        let invert = Invert::new([Field::User, Field::Data, Field::User]);
        assert_eq!(invert, Invert::new([Field::Data, Field::User]));
        assert_eq!(invert.apply(sample()), Invert::default().apply(sample()));
    }

    #[test]
    fn identity_and_closures_are_transforms() {
        assert_eq!(Identity.apply(sample()), sample());

        let clear_id = |value: AxisValue| value.with(Field::Id, Bits::zero(8));
        assert_eq!(clear_id.apply(sample()).tid, Bits::zero(8));
    }
}
