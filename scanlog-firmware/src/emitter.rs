//! Delivery of records to the collector over TCP.

use embassy_net::{IpEndpoint, Ipv4Address, Stack, tcp::TcpSocket};
use embassy_time::Duration;
use scanlog_core::{EmitError, Emitter, Record, request};

const RX_BUF_LEN: usize = 256;
const TX_BUF_LEN: usize = request::REQUEST_CAPACITY;

/// Sends each record as an HTTP/1.0 request on a fresh connection.
///
/// The response is not read, the connection is closed right after the request went out.
pub struct HttpEmitter<'a> {
    stack: Stack<'a>,
    endpoint: IpEndpoint,
    path: &'static str,
    timeout: Duration,
    rx_buf: [u8; RX_BUF_LEN],
    tx_buf: [u8; TX_BUF_LEN],
}

impl<'a> HttpEmitter<'a> {
    pub fn new(
        stack: Stack<'a>,
        addr: Ipv4Address,
        port: u16,
        path: &'static str,
        timeout: Duration,
    ) -> Self {
        Self {
            stack,
            endpoint: IpEndpoint::new(addr.into(), port),
            path,
            timeout,
            rx_buf: [0; RX_BUF_LEN],
            tx_buf: [0; TX_BUF_LEN],
        }
    }
}

impl Emitter for HttpEmitter<'_> {
    async fn emit(&mut self, record: &Record<'_>) -> Result<(), EmitError> {
        defmt::debug!(
            "attempting to send data (name = {}, code = {})",
            record.name,
            record.code
        );

        let request = request::render(self.path, record).inspect_err(|_| {
            defmt::error!("Request for {} does not fit the buffer", self.path);
        })?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx_buf, &mut self.tx_buf);
        socket.set_timeout(Some(self.timeout));

        if let Err(e) = socket.connect(self.endpoint).await {
            defmt::warn!("Connection to {} failed: {}", self.endpoint, e);
            return Err(EmitError::Connect);
        }
        defmt::debug!("Connected to {}", self.endpoint);

        let bytes = request.as_bytes();
        let mut n = 0;
        while n < bytes.len() {
            match socket.write(&bytes[n..]).await {
                Ok(0) => {
                    socket.abort();
                    return Err(EmitError::Write);
                }
                Ok(written) => n += written,
                Err(e) => {
                    defmt::warn!("Request write failed: {}", e);
                    socket.abort();
                    return Err(EmitError::Write);
                }
            }
        }

        socket.close();
        let flushed = socket.flush().await;
        if let Err(e) = flushed {
            defmt::warn!("Request flush failed: {}", e);
            socket.abort();
            return Err(EmitError::Flush);
        }

        defmt::info!("request sent");
        Ok(())
    }
}
