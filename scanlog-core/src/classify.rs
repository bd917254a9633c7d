//! Identifier/payload classification and the identifier cache.

use arrayvec::ArrayString;

use crate::{
    assembler::Line,
    config::{IDENTIFIER_THRESHOLD, LINE_CAPACITY},
};

/// What a completed line is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    /// Contextual line (e.g. an operator's name), cached to tag later payloads.
    Identifier,
    /// Line forwarded to the collector right away.
    Payload,
}

/// Classify a line by its first character.
///
/// A line starting above [`IDENTIFIER_THRESHOLD`], i.e. with a letter, is an identifier.
/// Everything else, the empty line included, is a payload. This is a plain heuristic; the line
/// content is not validated any further.
pub fn classify(line: &str) -> Classification {
    match line.chars().next() {
        Some(c) if c as u32 > IDENTIFIER_THRESHOLD => Classification::Identifier,
        _ => Classification::Payload,
    }
}

/// The most recent identifier and when it was set.
///
/// Times are milliseconds since boot.
pub struct IdentifierCache<const N: usize = LINE_CAPACITY> {
    name: Line<N>,
    updated_ms: u64,
}

impl<const N: usize> IdentifierCache<N> {
    /// Construct an empty cache, last updated at boot.
    pub const fn new() -> Self {
        Self {
            name: ArrayString::new_const(),
            updated_ms: 0,
        }
    }

    /// The cached identifier, empty if there is none.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the cached identifier.
    pub fn snapshot(&self) -> Line<N> {
        self.name
    }

    pub fn updated_ms(&self) -> u64 {
        self.updated_ms
    }

    /// Time since the last update, or `None` if `now_ms` lies before it.
    pub fn age(&self, now_ms: u64) -> Option<u64> {
        now_ms.checked_sub(self.updated_ms)
    }

    /// Clear the identifier if it is older than `threshold_ms`, or if the clock went backwards.
    ///
    /// Returns `true` when the cache was found stale.
    pub fn expire(&mut self, now_ms: u64, threshold_ms: u64) -> bool {
        match self.age(now_ms) {
            Some(age) if age <= threshold_ms => false,
            _ => {
                self.clear();
                true
            }
        }
    }

    /// Replace the identifier with `name`.
    pub fn store(&mut self, name: &Line<N>, now_ms: u64) {
        self.name = *name;
        self.updated_ms = now_ms;
    }

    /// Restart the identifier's age without changing it.
    pub fn touch(&mut self, now_ms: u64) {
        self.updated_ms = now_ms;
    }

    /// Forget the identifier.
    pub fn clear(&mut self) {
        self.name.clear();
    }
}

impl<const N: usize> Default for IdentifierCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Line<20> {
        ArrayString::from(s).unwrap()
    }

    #[test]
    fn letters_are_identifiers() {
        for s in ["A", "ABC123", "Z9", "M ,./"] {
            assert_eq!(classify(s), Classification::Identifier, "{s:?}");
        }
    }

    #[test]
    fn digits_and_punctuation_are_payloads() {
        for s in ["0", "4500", "9ABC", " A", ",", ".", "/"] {
            assert_eq!(classify(s), Classification::Payload, "{s:?}");
        }
    }

    #[test]
    fn empty_line_is_payload() {
        assert_eq!(classify(""), Classification::Payload);
    }

    #[test]
    fn threshold_boundary() {
        assert_eq!(classify("@"), Classification::Payload);
        assert_eq!(classify("A"), Classification::Identifier);
    }

    #[test]
    fn store_overwrites() {
        let mut cache = IdentifierCache::<20>::new();
        assert_eq!(cache.name(), "");
        cache.store(&line("ALICE"), 100);
        cache.store(&line("BOB"), 200);
        assert_eq!(cache.name(), "BOB");
        assert_eq!(cache.updated_ms(), 200);
    }

    #[test]
    fn fresh_identifier_survives() {
        let mut cache = IdentifierCache::<20>::new();
        cache.store(&line("ALICE"), 1_000);
        assert!(!cache.expire(1_000, 60_000));
        assert!(!cache.expire(61_000, 60_000));
        assert_eq!(cache.name(), "ALICE");
    }

    #[test]
    fn stale_identifier_is_cleared() {
        let mut cache = IdentifierCache::<20>::new();
        cache.store(&line("ALICE"), 1_000);
        assert!(cache.expire(61_001, 60_000));
        assert_eq!(cache.name(), "");
    }

    #[test]
    fn clock_going_backwards_clears() {
        let mut cache = IdentifierCache::<20>::new();
        cache.store(&line("ALICE"), 5_000);
        assert_eq!(cache.age(4_000), None);
        assert!(cache.expire(4_000, 60_000));
        assert_eq!(cache.name(), "");
    }

    #[test]
    fn touch_restarts_age() {
        let mut cache = IdentifierCache::<20>::new();
        cache.store(&line("ALICE"), 0);
        cache.touch(50_000);
        assert_eq!(cache.age(100_000), Some(50_000));
        assert!(!cache.expire(100_000, 60_000));
        assert_eq!(cache.name(), "ALICE");
    }
}
