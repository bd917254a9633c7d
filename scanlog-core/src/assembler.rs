//! Line assembly from a stream of scan codes.

use core::mem;

use arrayvec::ArrayString;

use crate::{
    config::LINE_CAPACITY,
    fmt,
    keymap::{self, SCAN_BREAK, SCAN_ENTER},
};

/// A completed (or in progress) line of at most `N` characters.
pub type Line<const N: usize = LINE_CAPACITY> = ArrayString<N>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Collecting characters.
    Idle,
    /// The previous scan code was [`SCAN_BREAK`], the next one is a key release.
    BreakPending,
}

/// Turns scan codes into lines.
///
/// Only key presses are echoed into the line: a [`SCAN_BREAK`] swallows the scan code that
/// follows it. Characters past capacity are dropped, ENTER always completes the line.
pub struct LineAssembler<const N: usize = LINE_CAPACITY> {
    state: State,
    buffer: Line<N>,
}

impl<const N: usize> LineAssembler<N> {
    /// Construct an empty [`LineAssembler`].
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            buffer: ArrayString::new_const(),
        }
    }

    /// Feed one scan code. Returns the completed line when `symbol` is ENTER.
    ///
    /// The assembler is left empty after returning a line.
    pub fn feed(&mut self, symbol: u8) -> Option<Line<N>> {
        if symbol == SCAN_BREAK {
            self.state = State::BreakPending;
            return None;
        }

        if self.state == State::BreakPending {
            // released key, never echoed
            self.state = State::Idle;
            return None;
        }

        if symbol == SCAN_ENTER {
            return Some(mem::take(&mut self.buffer));
        }

        match keymap::lookup(symbol) {
            Some(c) => {
                if self.buffer.try_push(c).is_err() {
                    fmt::trace!("line full, dropping {}", c);
                }
            }
            None => fmt::trace!("ignoring unmapped scan code {:#x}", symbol),
        }

        None
    }

    /// The line assembled so far.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Check if a key release is expected next.
    pub fn break_pending(&self) -> bool {
        self.state == State::BreakPending
    }

    /// Drop the line assembled so far and any pending break.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = State::Idle;
    }
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::keymap::symbol_for;

    fn feed_str<const N: usize>(asm: &mut LineAssembler<N>, text: &str) {
        for c in text.chars() {
            assert_eq!(asm.feed(symbol_for(c).unwrap()), None);
        }
    }

    #[test]
    fn collects_mapped_characters() {
        let mut asm = LineAssembler::<20>::new();
        feed_str(&mut asm, "AB 12,./");
        assert_eq!(asm.pending(), "AB 12,./");
    }

    #[test]
    fn unmapped_codes_are_skipped() {
        let mut asm = LineAssembler::<20>::new();
        for symbol in [0x1c, 0x00, 0xe0, 0x32, 0x76, 0x21] {
            assert_eq!(asm.feed(symbol), None);
        }
        assert_eq!(asm.pending(), "ABC");
    }

    #[test]
    fn enter_completes_and_clears() {
        let mut asm = LineAssembler::<20>::new();
        feed_str(&mut asm, "4711");
        let line = asm.feed(SCAN_ENTER).unwrap();
        assert_eq!(line.as_str(), "4711");
        assert_eq!(asm.pending(), "");

        feed_str(&mut asm, "9");
        assert_eq!(asm.feed(SCAN_ENTER).unwrap().as_str(), "9");
    }

    #[test]
    fn enter_on_empty_line() {
        let mut asm = LineAssembler::<20>::new();
        let line = asm.feed(SCAN_ENTER).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn key_releases_are_not_echoed() {
        let mut asm = LineAssembler::<20>::new();
        // press A, release A, press B, release B
        for symbol in [0x1c, SCAN_BREAK, 0x1c, 0x32, SCAN_BREAK, 0x32] {
            assert_eq!(asm.feed(symbol), None);
        }
        assert_eq!(asm.pending(), "AB");
        assert!(!asm.break_pending());
    }

    #[test]
    fn break_is_consumed_by_exactly_one_code() {
        let mut asm = LineAssembler::<20>::new();
        asm.feed(SCAN_BREAK);
        assert!(asm.break_pending());
        // an unmapped code still consumes the break
        asm.feed(0x00);
        assert!(!asm.break_pending());
        asm.feed(0x1c);
        assert_eq!(asm.pending(), "A");
    }

    #[test]
    fn released_enter_does_not_complete() {
        let mut asm = LineAssembler::<20>::new();
        feed_str(&mut asm, "12");
        assert_eq!(asm.feed(SCAN_ENTER).unwrap().as_str(), "12");
        assert_eq!(asm.feed(SCAN_BREAK), None);
        assert_eq!(asm.feed(SCAN_ENTER), None);
        assert_eq!(asm.pending(), "");
    }

    #[test]
    fn repeated_break_stays_pending() {
        let mut asm = LineAssembler::<20>::new();
        asm.feed(SCAN_BREAK);
        asm.feed(SCAN_BREAK);
        assert!(asm.break_pending());
        asm.feed(0x1c);
        asm.feed(0x32);
        assert_eq!(asm.pending(), "B");
    }

    #[test]
    fn overflow_is_dropped() {
        let mut asm = LineAssembler::<4>::new();
        feed_str(&mut asm, "1234");
        assert_eq!(asm.pending(), "1234");
        feed_str(&mut asm, "56");
        assert_eq!(asm.pending(), "1234");
        assert_eq!(asm.feed(SCAN_ENTER).unwrap().as_str(), "1234");
    }

    #[test]
    fn reset_clears_state() {
        let mut asm = LineAssembler::<20>::new();
        feed_str(&mut asm, "AB");
        asm.feed(SCAN_BREAK);
        asm.reset();
        assert_eq!(asm.pending(), "");
        assert!(!asm.break_pending());
    }
}
