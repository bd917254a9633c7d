//! HTTP request encoding of a [`Record`].
//!
//! A record travels as a single body-less HTTP/1.0 request, all fields in the query string:
//!
//! ```text
//! POST /barcode?name=ALICE&code=4006381333931&uptime=123456 HTTP/1.0
//! ```

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use crate::emit::{EmitError, Record};

/// Path the collector listens on.
pub const DEFAULT_PATH: &str = "/barcode";

/// Room for a request with two full, fully escaped lines and a reasonably short path.
pub const REQUEST_CAPACITY: usize = 256;

/// A rendered request.
pub type Request = ArrayString<REQUEST_CAPACITY>;

/// Query string value, percent-encoded on display.
///
/// Only RFC 3986 unreserved characters are passed through.
pub struct Encoded<'a>(pub &'a str);

impl fmt::Display for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    f.write_char(byte as char)?
                }
                _ => write!(f, "%{byte:02X}")?,
            }
        }
        Ok(())
    }
}

/// Write the request for `record` to `out`.
pub fn write_request<W: Write>(out: &mut W, path: &str, record: &Record<'_>) -> fmt::Result {
    write!(
        out,
        "POST {path}?name={}&code={}&uptime={} HTTP/1.0\r\n\r\n",
        Encoded(record.name),
        Encoded(record.code),
        record.uptime_ms,
    )
}

/// Render the request for `record` into a fixed buffer.
///
/// Fails with [`EmitError::Encode`] only if `path` is too long for [`REQUEST_CAPACITY`].
pub fn render(path: &str, record: &Record<'_>) -> Result<Request, EmitError> {
    let mut request = Request::new();
    write_request(&mut request, path, record).map_err(|_| EmitError::Encode)?;
    Ok(request)
}
