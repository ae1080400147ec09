//! Port declarations and channel types.

use std::collections::VecDeque;
use std::fmt;

use itertools::{EitherOrBoth, Itertools};

use crate::utils::join_options;

/// Port declarations of a value: a named tree of bit widths.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortDecls {
    /// Collection of members. A member without name is flattened into its parent.
    Struct(Vec<(Option<String>, PortDecls)>),

    /// Single port which contains its width.
    Bits(usize),
}

impl PortDecls {
    /// Width of `PortDecls`.
    pub fn width(&self) -> usize {
        match self {
            PortDecls::Struct(inner) => inner.iter().map(|(_, m)| m.width()).sum(),
            PortDecls::Bits(width) => *width,
        }
    }

    /// Iterator for `PortDecls`.
    ///
    /// # Note
    ///
    /// The iterator returns (name, width) for inner fields **ONLY** with nonzero width.
    /// This is to ignore meaningless unit types.
    pub fn iter(&self) -> ValueTypIterator { self.into_iter() }

    /// Returns the first port whose name or width differs between `self` and `other`.
    ///
    /// A port missing on one side is reported with width 0 on that side.
    pub fn first_mismatch(&self, other: &Self) -> Option<PortMismatch> {
        self.iter().zip_longest(other.iter()).find_map(|pair| match pair {
            EitherOrBoth::Both((lname, lwidth), (rname, rwidth)) => {
                if lname != rname {
                    Some(PortMismatch { name: port_name(&lname), left: lwidth, right: 0 })
                } else if lwidth != rwidth {
                    Some(PortMismatch { name: port_name(&lname), left: lwidth, right: rwidth })
                } else {
                    None
                }
            }
            EitherOrBoth::Left((name, width)) => Some(PortMismatch { name: port_name(&name), left: width, right: 0 }),
            EitherOrBoth::Right((name, width)) => Some(PortMismatch { name: port_name(&name), left: 0, right: width }),
        })
    }

    fn iter_with_prefix(&self, prefix: Option<String>) -> ValueTypIterator {
        let mut iter_vec = vec![];

        match self {
            PortDecls::Struct(inner) => {
                for (name, member) in inner {
                    iter_vec.extend(member.iter_with_prefix(join_options("_", [prefix.clone(), name.clone()])).inner)
                }
            }
            PortDecls::Bits(width) => {
                if *width > 0 {
                    iter_vec.push((prefix, *width));
                }
            }
        }

        ValueTypIterator { inner: iter_vec.into() }
    }
}

fn port_name(name: &Option<String>) -> String { name.clone().unwrap_or_else(|| "<anonymous>".to_string()) }

impl IntoIterator for &PortDecls {
    type IntoIter = ValueTypIterator;
    type Item = (Option<String>, usize);

    fn into_iter(self) -> Self::IntoIter { self.iter_with_prefix(None) }
}

impl fmt::Display for PortDecls {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.iter().map(|(name, width)| format!("{}[{}]", port_name(&name), width)).join(", "))
    }
}

/// Iterator for `PortDecls`.
#[derive(Debug)]
pub struct ValueTypIterator {
    inner: VecDeque<(Option<String>, usize)>,
}

impl Iterator for ValueTypIterator {
    type Item = (Option<String>, usize);

    fn next(&mut self) -> Option<Self::Item> { self.inner.pop_front() }
}

/// A port on which two declarations disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMismatch {
    /// Flattened port name.
    pub name: String,

    /// Width on the left-hand side.
    pub left: usize,

    /// Width on the right-hand side.
    pub right: usize,
}

/// Channel's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTyp {
    /// Forward value.
    pub fwd: PortDecls,

    /// Backward value.
    pub bwd: PortDecls,
}

impl ChannelTyp {
    /// Creates a new channel type.
    pub const fn new(fwd: PortDecls, bwd: PortDecls) -> Self { Self { fwd, bwd } }

    /// Returns the first port on which the two channel types disagree.
    pub fn first_mismatch(&self, other: &Self) -> Option<PortMismatch> {
        self.fwd.first_mismatch(&other.fwd).or_else(|| self.bwd.first_mismatch(&other.bwd))
    }
}
