//! Replay connection for raw capture files.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tracing::{debug, info};

use super::ConnectionCore;
use crate::driver::Driver;
use crate::packet::{DecodeOptions, Packet};
use crate::providers::ReplayProvider;
use crate::{Result, RtdError};

/// Replay connection playing back a recorded console byte stream.
///
/// Behaves like a live connection: chunks are paced, framed, and decoded
/// through the same pipeline.
pub struct ReplayConnection {
    core: ConnectionCore,
}

impl ReplayConnection {
    /// Open a capture file for replay.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default()).await
    }

    /// Open a capture file with explicit decode options.
    pub async fn open_with<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening capture file");

        let provider = ReplayProvider::new(path)?;
        Ok(Self::from_provider(provider, options))
    }

    /// Replay an in-memory capture (useful in tests and tooling).
    pub fn from_provider(provider: ReplayProvider, options: DecodeOptions) -> Self {
        let channels = Driver::spawn(provider, options);
        Self { core: ConnectionCore::new(channels) }
    }

    /// Decoded packets, one per well-formed frame.
    pub fn packets(&self) -> impl Stream<Item = Arc<Packet>> + use<> {
        self.core.packets()
    }

    /// Complete raw frames before decoding.
    pub fn raw_frames(&self) -> impl Stream<Item = Bytes> + use<> {
        self.core.raw_frames()
    }

    /// Raw transport chunks, as delivered.
    pub fn chunks(&self) -> impl Stream<Item = Bytes> + use<> {
        self.core.chunks()
    }

    /// Transport errors, distinct from (silently dropped) decode errors.
    pub fn errors(&self) -> impl Stream<Item = Arc<RtdError>> + use<> {
        self.core.errors()
    }
}

impl Drop for ReplayConnection {
    fn drop(&mut self) {
        debug!("dropping replay connection");
        self.core.cancel();
    }
}
