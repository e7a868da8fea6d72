//! String construction benchmark case
//!
//! The routine measured by `benches/string_construction.rs` and the dense
//! parameter range it is registered over.

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

/// Fill character used by the string construction benchmark
pub const FILL_CHAR: char = 'x';

/// Inclusive bounds of the registered string lengths
pub const DEFAULT_RANGE: DenseRange = DenseRange::new(0, 20);

/// Inclusive, step-1 range of benchmark parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenseRange {
    start: usize,
    end: usize,
}

impl DenseRange {
    /// Create a range covering `start..=end`
    ///
    /// A range with `start > end` is valid and empty.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of parameter values in the range
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Check whether `value` lies inside the inclusive bounds
    #[must_use]
    pub const fn contains(&self, value: usize) -> bool {
        self.start <= value && value <= self.end
    }

    /// Iterate over every parameter value in ascending order
    pub fn iter(&self) -> DenseRangeIter {
        DenseRangeIter {
            inner: self.start..=self.end,
        }
    }
}

impl IntoIterator for DenseRange {
    type Item = usize;
    type IntoIter = DenseRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DenseRange {
    type Item = usize;
    type IntoIter = DenseRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`DenseRange`]
#[derive(Debug, Clone)]
pub struct DenseRangeIter {
    inner: RangeInclusive<usize>,
}

impl Iterator for DenseRangeIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DenseRangeIter {
    fn next_back(&mut self) -> Option<usize> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for DenseRangeIter {}

impl FusedIterator for DenseRangeIter {}

/// Construct a string of `len` characters, each equal to `fill`
#[must_use]
pub fn construct_filled(len: usize, fill: char) -> String {
    std::iter::repeat_n(fill, len).collect()
}
