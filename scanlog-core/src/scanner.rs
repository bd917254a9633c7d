//! The per-decoder pipeline: assembly, classification, caching and emission.

use crate::{
    assembler::{Line, LineAssembler},
    classify::{self, Classification, IdentifierCache},
    config::{LINE_CAPACITY, ScannerConfig},
    emit::{EmitError, Emitter, Indicator, Record},
    fmt,
};

/// A completed line, after classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completed<const N: usize = LINE_CAPACITY> {
    /// The line is now the cached identifier.
    Identifier(Line<N>),
    /// The line has to be sent, tagged with `name`.
    Payload {
        name: Line<N>,
        code: Line<N>,
        uptime_ms: u64,
    },
}

impl<const N: usize> Completed<N> {
    pub fn classification(&self) -> Classification {
        match self {
            Completed::Identifier(_) => Classification::Identifier,
            Completed::Payload { .. } => Classification::Payload,
        }
    }

    /// The record to emit, `None` for identifiers.
    pub fn record(&self) -> Option<Record<'_>> {
        match self {
            Completed::Identifier(_) => None,
            Completed::Payload {
                name,
                code,
                uptime_ms,
            } => Some(Record {
                name: name.as_str(),
                code: code.as_str(),
                uptime_ms: *uptime_ms,
            }),
        }
    }
}

/// What [`Scanner::process`] did with a completed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Identifier stored, nothing sent.
    Cached,
    /// Payload delivered.
    Emitted,
    /// Payload lost, it is not retried.
    EmitFailed(EmitError),
}

/// All mutable state of one scanner.
///
/// Times are milliseconds since boot, supplied by the caller.
pub struct Scanner<const N: usize = LINE_CAPACITY> {
    assembler: LineAssembler<N>,
    cache: IdentifierCache<N>,
    config: ScannerConfig,
}

impl<const N: usize> Scanner<N> {
    /// Construct a [`Scanner`] with an empty line and no identifier.
    pub const fn new(config: ScannerConfig) -> Self {
        Self {
            assembler: LineAssembler::new(),
            cache: IdentifierCache::new(),
            config,
        }
    }

    /// The line assembled so far.
    pub fn pending(&self) -> &str {
        self.assembler.pending()
    }

    /// The cached identifier, empty if there is none.
    ///
    /// Staleness is only checked when a line completes, so this may still show an identifier
    /// that the next line will drop.
    pub fn identifier(&self) -> &str {
        self.cache.name()
    }

    /// Feed one scan code, classifying the line if it completes.
    ///
    /// Identifiers are cached as a side effect; payloads are returned for the caller to send.
    pub fn feed(&mut self, symbol: u8, now_ms: u64) -> Option<Completed<N>> {
        let line = self.assembler.feed(symbol)?;
        Some(self.complete(line, now_ms))
    }

    fn complete(&mut self, line: Line<N>, now_ms: u64) -> Completed<N> {
        fmt::info!("scanned {}", line.as_str());

        let age = self.cache.age(now_ms);
        if self.cache.expire(now_ms, self.config.flush_threshold_ms()) {
            match age {
                Some(age) => fmt::debug!("flushing identifier (age = {} seconds)", age / 1000),
                None => fmt::debug!("flushing identifier (clock went backwards)"),
            }
        }

        if self.config.refresh_on_any_line() {
            self.cache.touch(now_ms);
        }

        match classify::classify(&line) {
            Classification::Identifier => {
                fmt::info!("identifier found, caching it");
                self.cache.store(&line, now_ms);
                Completed::Identifier(line)
            }
            Classification::Payload => Completed::Payload {
                name: self.cache.snapshot(),
                code: line,
                uptime_ms: now_ms,
            },
        }
    }

    /// Feed one scan code and run the whole pipeline for a completed line: send payloads with
    /// `emitter`, then acknowledge the line on `indicator`.
    ///
    /// Returns `None` while the line is still being assembled.
    pub async fn process<E, I>(
        &mut self,
        symbol: u8,
        now_ms: u64,
        emitter: &mut E,
        indicator: &mut I,
    ) -> Option<Outcome>
    where
        E: Emitter,
        I: Indicator,
    {
        let completed = self.feed(symbol, now_ms)?;

        let outcome = match completed.record() {
            None => Outcome::Cached,
            Some(record) => {
                fmt::info!(
                    "payload found, sending (name = {}, code = {})",
                    record.name,
                    record.code
                );
                match emitter.emit(&record).await {
                    Ok(()) => Outcome::Emitted,
                    Err(e) => {
                        fmt::warn!("record not delivered: {:?}", e);
                        Outcome::EmitFailed(e)
                    }
                }
            }
        };

        indicator.acknowledge().await;
        Some(outcome)
    }
}

impl<const N: usize> Default for Scanner<N> {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}
