//! Scan code decoding and record classification for a PS/2 barcode scanner.
//!
//! The scanner behaves like a keyboard: every scanned code arrives as a burst of PS/2 scan codes
//! terminated by ENTER. The pipeline is, leaves first:
//!
//! 1. [`ps2::Decoder`] samples the clock and data lines and produces one scan code per call.
//! 2. [`keymap`] translates scan codes into characters.
//! 3. [`assembler::LineAssembler`] builds lines from scan codes, dropping key releases.
//! 4. [`classify`] decides whether a completed line is an identifier (cached) or a payload.
//! 5. [`emit::Emitter`] delivers payload records, tagged with the cached identifier.
//!
//! [`Scanner`] owns all mutable pipeline state, so any number of independent decoders may run
//! side by side and the whole pipeline can be driven without hardware.
//!
//! # Features
//!
//! - `log` (default): diagnostics go through the `log` crate.
//! - `defmt`: diagnostics go through `defmt`, and public types implement `defmt::Format`.

#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "defmt", feature = "log")))]
compile_error!("enable either the `defmt` or the `log` feature");

#[cfg(feature = "defmt")]
mod fmt {
    pub(crate) use defmt::{debug, info, trace, warn};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
mod fmt {
    pub(crate) use log::{debug, info, trace, warn};
}

pub mod assembler;
pub mod classify;
pub mod config;
pub mod emit;
pub mod keymap;
pub mod ps2;
pub mod request;
pub mod scanner;

pub use assembler::{Line, LineAssembler};
pub use classify::{Classification, IdentifierCache};
pub use config::ScannerConfig;
pub use emit::{EmitError, Emitter, Indicator, NoIndicator, Record};
pub use ps2::{DecodeError, Decoder, LineSampler, LineState, PinPair};
pub use scanner::{Completed, Outcome, Scanner};
