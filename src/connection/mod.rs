//! User-facing connections to a console byte stream.
//!
//! Both connection flavors run the same driver pipeline; they differ only in
//! where the bytes come from. Dropping a connection cancels the pipeline,
//! which discards any partial frame. Schema trees held by the caller keep
//! their last-known field values across a disconnect.

pub mod live;
pub mod replay;

pub use live::LiveConnection;
pub use replay::ReplayConnection;

use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::RtdError;
use crate::driver::DriverChannels;
use crate::packet::Packet;

/// Shared stream surface over a driver's broadcast channels.
pub(crate) struct ConnectionCore {
    channels: DriverChannels,
}

impl ConnectionCore {
    pub(crate) fn new(channels: DriverChannels) -> Self {
        Self { channels }
    }

    /// Decoded packets, one per well-formed frame.
    pub(crate) fn packets(&self) -> impl Stream<Item = Arc<Packet>> + use<> {
        subscribe(&self.channels.packets)
    }

    /// Complete raw frames before decoding.
    pub(crate) fn raw_frames(&self) -> impl Stream<Item = Bytes> + use<> {
        subscribe(&self.channels.frames)
    }

    /// Raw transport chunks (may be partial frames).
    pub(crate) fn chunks(&self) -> impl Stream<Item = Bytes> + use<> {
        subscribe(&self.channels.chunks)
    }

    /// Transport errors. Decode errors are absorbed by the pipeline and
    /// never appear here.
    pub(crate) fn errors(&self) -> impl Stream<Item = Arc<RtdError>> + use<> {
        subscribe(&self.channels.errors)
    }

    pub(crate) fn cancel(&self) {
        self.channels.cancel.cancel();
    }
}

/// Turn a broadcast sender into a stream, dropping lag notifications.
///
/// A slow subscriber that misses packets simply resumes at the live edge;
/// field state converges because every field re-reads its window from each
/// packet.
fn subscribe<T: Clone + Send + 'static>(
    tx: &tokio::sync::broadcast::Sender<T>,
) -> impl Stream<Item = T> + use<T> {
    BroadcastStream::new(tx.subscribe())
        .filter_map(|item| async move { item.ok() })
        .boxed()
}
