//! Fixed constants of the scanner and the runtime [`ScannerConfig`].

/// Maximum number of characters in one line. Further characters are dropped until ENTER.
pub const LINE_CAPACITY: usize = 20;

/// Age after which a cached identifier is considered stale, in milliseconds.
pub const FLUSH_THRESHOLD_MS: u64 = 60_000;

/// Lines whose first character has a code point above this value are identifiers.
///
/// 64 is `'@'`, so every uppercase letter qualifies while digits and punctuation do not.
pub const IDENTIFIER_THRESHOLD: u32 = 64;

/// How long the acknowledgment indicator stays lit after a completed line, in milliseconds.
pub const ACK_PULSE_MS: u64 = 300;

/// Runtime knobs of a [`crate::Scanner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScannerConfig {
    flush_threshold_ms: u64,
    refresh_on_any_line: bool,
}

impl ScannerConfig {
    pub const fn new() -> Self {
        Self {
            flush_threshold_ms: FLUSH_THRESHOLD_MS,
            refresh_on_any_line: false,
        }
    }

    /// Set the maximum identifier age.
    pub const fn with_flush_threshold_ms(mut self, ms: u64) -> Self {
        self.flush_threshold_ms = ms;
        self
    }

    /// When `true`, every completed line restarts the identifier's age, not only identifier
    /// lines. Payload scans then keep a busy operator's identifier alive.
    pub const fn with_refresh_on_any_line(mut self, refresh: bool) -> Self {
        self.refresh_on_any_line = refresh;
        self
    }

    pub const fn flush_threshold_ms(&self) -> u64 {
        self.flush_threshold_ms
    }

    pub const fn refresh_on_any_line(&self) -> bool {
        self.refresh_on_any_line
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
