//! Live connection to a console over serial.

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tracing::{debug, info};

use super::ConnectionCore;
use crate::driver::Driver;
use crate::packet::{DecodeOptions, Packet};
use crate::providers::SerialProvider;
use crate::{Result, RtdError};

/// Live connection reading RTD output from a serial port.
pub struct LiveConnection {
    core: ConnectionCore,
    port_name: String,
}

impl LiveConnection {
    /// Connect to a console on the given serial port (19200 8N1).
    pub async fn connect(port_name: &str) -> Result<Self> {
        Self::connect_with(port_name, DecodeOptions::default()).await
    }

    /// Connect with explicit decode options (e.g. checksum verification).
    pub async fn connect_with(port_name: &str, options: DecodeOptions) -> Result<Self> {
        info!(port = port_name, "connecting to console");

        let provider = SerialProvider::open(port_name)?;
        let channels = Driver::spawn(provider, options);

        info!(port = port_name, "live connection established");

        Ok(Self { core: ConnectionCore::new(channels), port_name: port_name.to_owned() })
    }

    /// Decoded packets, one per well-formed frame.
    pub fn packets(&self) -> impl Stream<Item = Arc<Packet>> + use<> {
        self.core.packets()
    }

    /// Complete raw frames before decoding.
    pub fn raw_frames(&self) -> impl Stream<Item = Bytes> + use<> {
        self.core.raw_frames()
    }

    /// Raw transport chunks, as delivered (may be partial frames).
    pub fn chunks(&self) -> impl Stream<Item = Bytes> + use<> {
        self.core.chunks()
    }

    /// Transport errors, distinct from (silently dropped) decode errors.
    pub fn errors(&self) -> impl Stream<Item = Arc<RtdError>> + use<> {
        self.core.errors()
    }

    /// The serial port this connection reads from.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Disconnect, discarding any partially received frame.
    ///
    /// Field values in caller-held schema trees are left at their last-known
    /// state.
    pub fn disconnect(self) {
        // Drop does the work.
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        debug!(port = %self.port_name, "dropping live connection");
        self.core.cancel();
    }
}
