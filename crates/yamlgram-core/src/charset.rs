//! Immutable sets of Unicode code points.
//!
//! A [`CharSet`] stores sorted, disjoint, inclusive ranges. Construction
//! merges overlapping and adjacent input, so two sets with the same members
//! always compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest Unicode scalar value.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// One construction item: a single code point or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharItem {
    Point(u32),
    Range(u32, u32),
}

impl From<u32> for CharItem {
    fn from(cp: u32) -> Self {
        Self::Point(cp)
    }
}

impl From<char> for CharItem {
    fn from(c: char) -> Self {
        Self::Point(c as u32)
    }
}

impl From<(u32, u32)> for CharItem {
    fn from((lo, hi): (u32, u32)) -> Self {
        Self::Range(lo, hi)
    }
}

impl From<(char, char)> for CharItem {
    fn from((lo, hi): (char, char)) -> Self {
        Self::Range(lo as u32, hi as u32)
    }
}

/// Set of code points as sorted, merged inclusive ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    /// Builds a set from points and ranges in any order.
    ///
    /// Reversed ranges (`lo > hi`) are swapped rather than dropped.
    pub fn from_ranges<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CharItem>,
    {
        let mut ranges: Vec<(u32, u32)> = items
            .into_iter()
            .map(|item| match item.into() {
                CharItem::Point(cp) => (cp, cp),
                CharItem::Range(lo, hi) if lo <= hi => (lo, hi),
                CharItem::Range(lo, hi) => (hi, lo),
            })
            .collect();
        ranges.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
        for (lo, hi) in ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        Self { ranges: merged }
    }

    /// Every Unicode code point.
    pub fn any() -> Self {
        Self {
            ranges: vec![(0, MAX_CODE_POINT)],
        }
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// Membership test.
    pub fn has(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    std::cmp::Ordering::Less
                } else if lo > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn contains(&self, c: char) -> bool {
        self.has(c as u32)
    }

    /// Set difference `self \ other`, as one merge-scan over both range lists.
    pub fn minus(&self, other: &CharSet) -> CharSet {
        let mut out = Vec::with_capacity(self.ranges.len());
        let mut j = 0;

        for &(lo, hi) in &self.ranges {
            while j < other.ranges.len() && other.ranges[j].1 < lo {
                j += 1;
            }

            let mut start = lo;
            let mut exhausted = false;
            let mut k = j;
            while k < other.ranges.len() && other.ranges[k].0 <= hi {
                let (cut_lo, cut_hi) = other.ranges[k];
                if cut_lo > start {
                    out.push((start, cut_lo - 1));
                }
                match cut_hi.checked_add(1) {
                    Some(next) if cut_hi < hi => start = start.max(next),
                    _ => {
                        exhausted = true;
                        break;
                    }
                }
                k += 1;
            }

            if !exhausted && start <= hi {
                out.push((start, hi));
            }
        }

        CharSet { ranges: out }
    }

    /// Set union.
    pub fn union(&self, other: &CharSet) -> CharSet {
        CharSet::from_ranges(self.ranges.iter().chain(&other.ranges).copied())
    }

    /// The single member, if the set has exactly one.
    pub fn as_single(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [(lo, hi)] if lo == hi => Some(*lo),
            _ => None,
        }
    }
}

/// Writes one code point in the `xHH` notation of the grammar dialect.
pub(crate) fn write_code_point(f: &mut fmt::Formatter<'_>, cp: u32) -> fmt::Result {
    write!(f, "x{cp:02X}")
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges == [(0, MAX_CODE_POINT)] {
            return f.write_str(".");
        }
        if self.ranges.is_empty() {
            return f.write_str("<never>");
        }

        let grouped = self.ranges.len() > 1;
        if grouped {
            f.write_str("( ")?;
        }
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            if lo == hi {
                write_code_point(f, lo)?;
            } else {
                f.write_str("[")?;
                write_code_point(f, lo)?;
                f.write_str("-")?;
                write_code_point(f, hi)?;
                f.write_str("]")?;
            }
        }
        if grouped {
            f.write_str(" )")?;
        }
        Ok(())
    }
}
