//! Byte ranges of the working text where no anchor may start or end

use crate::html::{ANCHOR_ELEMENT, MARKUP, SHORTCODE};
use crate::protect::PLACEHOLDER;
use std::ops::Range;

/// Sorted, explicitly maintained set of claimed ranges.
///
/// Built once from the masked text, then updated in place as anchors are
/// spliced in, so matching never needs lookaround.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedRanges {
    ranges: Vec<Range<usize>>,
}

impl ClaimedRanges {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim every anchor element, tag, comment, shortcode and placeholder
    /// token in `text`
    pub fn from_text(text: &str) -> Self {
        let mut claimed = Self::new();
        for re in [&*ANCHOR_ELEMENT, &*MARKUP, &*SHORTCODE, &*PLACEHOLDER] {
            for m in re.find_iter(text) {
                claimed.insert(m.range());
            }
        }
        claimed
    }

    /// Add a range, keeping the set sorted by start
    pub fn insert(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let at = self.ranges.partition_point(|r| r.start <= range.start);
        self.ranges.insert(at, range);
    }

    /// Whether `range` overlaps any claimed range
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        // Ranges starting at or after `range.end` cannot overlap
        let upper = self.ranges.partition_point(|r| r.start < range.end);
        self.ranges[..upper].iter().any(|r| r.end > range.start)
    }

    /// Record a splice: `removed` bytes at `at` were replaced by `inserted`
    /// bytes. Ranges after the splice move; the inserted span is claimed.
    pub fn splice(&mut self, at: usize, removed: usize, inserted: usize) {
        let old_end = at + removed;
        for r in self.ranges.iter_mut().filter(|r| r.start >= old_end) {
            r.start = r.start - removed + inserted;
            r.end = r.end - removed + inserted;
        }
        self.insert(at..at + inserted);
    }

    /// Number of claimed ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether nothing is claimed
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Claimed ranges in start order
    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.ranges.iter()
    }
}
