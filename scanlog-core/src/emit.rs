//! Records and the collaborators that deliver and acknowledge them.

/// One payload scan, tagged with the identifier cached at the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record<'a> {
    /// Cached identifier, empty if none was fresh.
    pub name: &'a str,
    /// The payload line.
    pub code: &'a str,
    /// Milliseconds since boot when the payload was completed.
    pub uptime_ms: u64,
}

/// Why a record did not reach the collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmitError {
    /// No connection to the collector could be established.
    Connect,
    /// The connection broke while writing the request.
    Write,
    /// The request could not be flushed out.
    Flush,
    /// The record could not be rendered into a request.
    Encode,
}

/// Sink for payload records.
///
/// Delivery is attempted once; the caller does not retry on failure.
#[allow(async_fn_in_trait)]
pub trait Emitter {
    async fn emit(&mut self, record: &Record<'_>) -> Result<(), EmitError>;
}

impl<T: Emitter + ?Sized> Emitter for &mut T {
    async fn emit(&mut self, record: &Record<'_>) -> Result<(), EmitError> {
        (**self).emit(record).await
    }
}

/// Visible feedback that a line was read, e.g. an LED blink.
#[allow(async_fn_in_trait)]
pub trait Indicator {
    async fn acknowledge(&mut self);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    async fn acknowledge(&mut self) {
        (**self).acknowledge().await
    }
}

/// [`Indicator`] that does nothing.
pub struct NoIndicator;

impl Indicator for NoIndicator {
    async fn acknowledge(&mut self) {}
}
