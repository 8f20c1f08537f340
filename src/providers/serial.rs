//! Live serial provider for the console's RTD output.

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

use crate::provider::Provider;
use crate::{Result, RtdError};

/// RTD output is fixed at 19200 baud, 8 data bits, 1 stop bit, no parity.
pub const BAUD_RATE: u32 = 19200;

const READ_BUFFER: usize = 1024;

/// Provider that reads chunks from the console's serial port.
pub struct SerialProvider {
    port_name: String,
    port: SerialStream,
    buf: Vec<u8>,
}

impl SerialProvider {
    /// Open the console's serial port.
    ///
    /// Opening consumes the port; a second connection to the same port fails
    /// here with [`RtdError::Connection`] rather than corrupting an existing
    /// one.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = tokio_serial::new(port_name, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .open_native_async()
            .map_err(|e| {
                RtdError::connection_failed_with_source(
                    format!("failed to open serial port {port_name}"),
                    Box::new(e),
                )
            })?;

        info!(port = port_name, baud = BAUD_RATE, "serial port opened");

        Ok(Self { port_name: port_name.to_owned(), port, buf: vec![0; READ_BUFFER] })
    }

    /// The port this provider reads from.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait::async_trait]
impl Provider for SerialProvider {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let n = self
            .port
            .read(&mut self.buf)
            .await
            .map_err(|e| RtdError::port_error(self.port_name.clone(), e))?;

        if n == 0 {
            debug!(port = %self.port_name, "serial port closed");
            return Ok(None);
        }

        Ok(Some(Bytes::copy_from_slice(&self.buf[..n])))
    }
}
