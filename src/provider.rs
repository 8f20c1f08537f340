//! Provider trait for byte-chunk sources.

use bytes::Bytes;

use crate::Result;

/// Trait for sources of console bytes.
///
/// Providers abstract over the transport (live serial port, capture replay)
/// and deliver chunks in arrival order. A chunk is whatever the transport
/// handed over; it carries no frame alignment guarantees. The driver's
/// framer handles that.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next chunk of console bytes.
    ///
    /// Returns:
    /// - `Ok(Some(chunk))` - new bytes available
    /// - `Ok(None)` - stream ended (normal termination)
    /// - `Err(e)` - transport error
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}
