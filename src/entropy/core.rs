//! Core entropy calculation primitives.
//!
//! Entropy is measured over Unicode scalar values, so a decoded URL with
//! non-ASCII look-alikes is weighed by characters rather than UTF-8 bytes.

use std::collections::BTreeMap;

/// Calculates the Shannon entropy of a string, in bits per character.
///
/// Returns 0.0 for the empty string and for single-symbol strings;
/// `"ab"` yields exactly 1.0.
#[inline]
pub fn shannon_entropy(text: &str) -> f64 {
    CharHistogram::from_str(text).entropy()
}

/// Character frequency histogram.
///
/// ASCII counts live in a fixed table; anything else spills into an
/// ordered map so summation order is stable.
#[derive(Debug, Clone)]
pub struct CharHistogram {
    ascii: [usize; 128],
    other: BTreeMap<char, usize>,
    total: usize,
}

impl Default for CharHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl CharHistogram {
    /// Creates a new empty histogram.
    #[inline]
    pub fn new() -> Self {
        Self {
            ascii: [0; 128],
            other: BTreeMap::new(),
            total: 0,
        }
    }

    /// Creates a histogram from the characters of a string.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let mut hist = Self::new();
        for c in text.chars() {
            hist.add(c);
        }
        hist
    }

    /// Adds a character to the histogram.
    #[inline]
    pub fn add(&mut self, c: char) {
        if c.is_ascii() {
            self.ascii[c as usize] += 1;
        } else {
            *self.other.entry(c).or_insert(0) += 1;
        }
        self.total += 1;
    }

    /// Number of distinct characters seen.
    pub fn distinct(&self) -> usize {
        self.ascii.iter().filter(|&&n| n > 0).count() + self.other.len()
    }

    /// Calculates the entropy of the current histogram.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let total = self.total as f64;
        let mut entropy = 0.0;

        for &count in self.ascii.iter().chain(self.other.values()) {
            if count == 0 {
                continue;
            }
            let p = (count as f64) / total;
            entropy -= p * p.log2();
        }

        // -0.0 for single-symbol input
        entropy.max(0.0)
    }

    /// Returns the total number of characters in the histogram.
    #[inline]
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns true if the histogram is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
