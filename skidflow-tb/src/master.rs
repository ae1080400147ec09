//! AXI4-Stream master driver.

use std::collections::{BTreeMap, VecDeque};

use crate::*;

/// One word handed to the master.
///
/// Signals left unset keep the value they had in the previous word. A bare TDATA value converts into a word with
/// only TDATA set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    fields: BTreeMap<Field, Bits>,
    tlast: Option<bool>,
}

impl Word {
    /// Sets a field.
    #[must_use]
    pub fn set(mut self, field: Field, bits: Bits) -> Self {
        self.fields.insert(field, bits);
        self
    }

    /// Sets TLAST. Only allowed when the master does not drive TLAST itself.
    #[must_use]
    pub fn tlast(mut self, tlast: bool) -> Self {
        self.tlast = Some(tlast);
        self
    }

    /// Returns `base` with every signal set in this word replaced.
    pub fn apply_to(&self, base: &AxisValue) -> AxisValue {
        let value = self.fields.iter().fold(base.clone(), |value, (field, bits)| value.with(*field, bits.clone()));
        match self.tlast {
            Some(tlast) => value.with_tlast(tlast),
            None => value,
        }
    }
}

impl From<Bits> for Word {
    fn from(tdata: Bits) -> Self { Word::default().set(Field::Data, tdata) }
}

impl From<AxisValue> for Word {
    fn from(value: AxisValue) -> Self {
        let word = Field::ALL.iter().fold(Word::default(), |word, field| word.set(*field, value.field(*field).clone()));
        word.tlast(value.tlast)
    }
}

/// AXI4-Stream master.
///
/// Drives one queued transaction at a time and holds it, with TVALID high, until the consumer accepts it.
#[derive(Debug)]
pub struct AxisMaster {
    config: AxisConfig,
    /// Signals as last driven. TSTRB and TKEEP start all ones, everything else zero.
    previous: AxisValue,
    queue: VecDeque<AxisValue>,
    sent: usize,
}

impl AxisMaster {
    /// Creates an idle master for a port of the given shape.
    pub fn new(config: AxisConfig) -> Self {
        let previous = config
            .blank()
            .with(Field::Strb, Bits::ones(config.width(Field::Strb)))
            .with(Field::Keep, Bits::ones(config.width(Field::Keep)));
        Self { config, previous, queue: VecDeque::new(), sent: 0 }
    }

    /// Queues `words` and returns the transactions that will be driven for them.
    ///
    /// With `tlast_on_last`, the master asserts TLAST on the last word only, and words must not set TLAST. Nothing
    /// is queued if any word is malformed.
    pub fn write<W: Into<Word>, I: IntoIterator<Item = W>>(
        &mut self, words: I, tlast_on_last: bool,
    ) -> Result<Vec<AxisValue>, TbError> {
        let words = words.into_iter().map(Into::into).collect::<Vec<Word>>();
        let mut base = self.queue.back().unwrap_or(&self.previous).clone();
        let mut values = Vec::with_capacity(words.len());

        for (index, word) in words.iter().enumerate() {
            if tlast_on_last && word.tlast.is_some() {
                return Err(TbError::Malformed {
                    index,
                    reason: "TLAST is already controlled by the driver (tlast_on_last)".to_string(),
                });
            }

            let mut value = word.apply_to(&base);
            if tlast_on_last {
                value.tlast = index + 1 == words.len();
            }

            if let Some(mismatch) = self.config.port_decls().first_mismatch(&value.port_decls()) {
                return Err(TbError::Malformed {
                    index,
                    reason: format!(
                        "signal {} is {} bits wide but the port has {} bits",
                        mismatch.name, mismatch.right, mismatch.left
                    ),
                });
            }

            base = value.clone();
            values.push(value);
        }

        self.queue.extend(values.iter().cloned());
        Ok(values)
    }

    /// Forward signals for the current cycle.
    pub fn fwd(&self) -> Valid<AxisValue> {
        match self.queue.front() {
            Some(value) => Valid::valid(value.clone()),
            None => Valid::invalid(self.previous.clone()),
        }
    }

    /// Observes the consumer's ready for the current cycle.
    pub fn commit(&mut self, bwd: &Ready) {
        if !bwd.ready {
            return;
        }
        if let Some(value) = self.queue.pop_front() {
            self.previous = value;
            self.sent += 1;
        }
    }

    /// Whether every queued word has been accepted.
    pub fn is_idle(&self) -> bool { self.queue.is_empty() }

    /// Number of words still waiting to be accepted.
    pub fn pending(&self) -> usize { self.queue.len() }

    /// Number of accepted words.
    pub fn sent(&self) -> usize { self.sent }
}
