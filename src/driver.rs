//! Driver spawns and manages the decode pipeline task.
//!
//! One task owns the provider and the framer, so all mutable pipeline state
//! lives on a single logical thread: each chunk is framed, decoded, and
//! broadcast to completion before the next chunk is read. Malformed frames
//! are dropped here; transport errors are surfaced on a dedicated channel.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::RtdError;
use crate::framer::Framer;
use crate::packet::{DecodeOptions, Packet};
use crate::provider::Provider;

const CHANNEL_CAPACITY: usize = 64;
const MAX_ERRORS: u32 = 10;

/// Broadcast channels produced by spawning a driver.
///
/// Senders are held so late subscribers can attach at any time; sending with
/// no receivers is a no-op.
pub struct DriverChannels {
    /// Raw transport chunks, as delivered (may be partial frames).
    pub chunks: broadcast::Sender<Bytes>,
    /// Complete raw frames, `0x16` through `0x17` inclusive.
    pub frames: broadcast::Sender<Bytes>,
    /// Decoded packets.
    pub packets: broadcast::Sender<Arc<Packet>>,
    /// Transport errors (decode errors never appear here).
    pub errors: broadcast::Sender<Arc<RtdError>>,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the decode pipeline task.
pub struct Driver;

impl Driver {
    /// Spawn the pipeline task for the given provider.
    pub fn spawn<P>(provider: P, options: DecodeOptions) -> DriverChannels
    where
        P: Provider,
    {
        let (chunks, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (frames, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (packets, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (errors, _) = broadcast::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let channels = DriverChannels {
            chunks: chunks.clone(),
            frames: frames.clone(),
            packets: packets.clone(),
            errors: errors.clone(),
            cancel: cancel.clone(),
        };

        tokio::spawn(async move {
            Self::pipeline_task(provider, chunks, frames, packets, errors, options, cancel).await;
        });

        channels
    }

    /// Pipeline task - frames chunks, decodes frames, broadcasts results.
    #[allow(clippy::too_many_arguments)]
    async fn pipeline_task<P>(
        mut provider: P,
        chunks: broadcast::Sender<Bytes>,
        frames: broadcast::Sender<Bytes>,
        packets: broadcast::Sender<Arc<Packet>>,
        errors: broadcast::Sender<Arc<RtdError>>,
        options: DecodeOptions,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!("decode pipeline started");
        let mut framer = Framer::new();
        let mut packet_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("decode pipeline cancelled");
                    break;
                }
                result = provider.next_chunk() => result,
            };

            match result {
                Ok(Some(chunk)) => {
                    error_count = 0;

                    // Chunk is observable before it enters the framer.
                    let _ = chunks.send(chunk.clone());

                    for frame in framer.feed(&chunk) {
                        let _ = frames.send(frame.clone());

                        match Packet::decode_with(frame, &options) {
                            Ok(packet) => {
                                packet_count += 1;
                                trace!(
                                    offset = packet.header.offset,
                                    payload_len = packet.data.raw.len(),
                                    "packet decoded"
                                );
                                let _ = packets.send(Arc::new(packet));
                            }
                            Err(e) => {
                                // Malformed frame: drop it, keep the stream.
                                debug!(error = %e, "dropping malformed frame");
                            }
                        }
                    }
                }
                Ok(None) => {
                    info!(packets = packet_count, "provider stream ended");
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!(error = %e, attempt = error_count, max = MAX_ERRORS, "provider error");
                    let _ = errors.send(Arc::new(e));

                    if error_count >= MAX_ERRORS {
                        error!("too many provider errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let backoff =
                        std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        // A partial frame never survives the session.
        framer.reset();
        info!(packets = packet_count, "decode pipeline ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ReplayProvider;
    use crate::test_utils::build_frame;

    #[tokio::test]
    async fn pipeline_broadcasts_frames_and_packets() {
        let mut capture = build_frame(0, b"00:30     ").to_vec();
        capture.extend_from_slice(&build_frame(100, b"  12  15"));

        let channels =
            Driver::spawn(ReplayProvider::from_bytes(capture), DecodeOptions::default());
        let mut frames = channels.frames.subscribe();
        let mut packets = channels.packets.subscribe();

        let first = packets.recv().await.unwrap();
        assert_eq!(first.header.offset, 0);
        let second = packets.recv().await.unwrap();
        assert_eq!(second.header.offset, 100);

        assert_eq!(frames.recv().await.unwrap()[0], crate::packet::FRAME_START);
        channels.cancel.cancel();
    }

    #[tokio::test]
    async fn malformed_frame_is_dropped_and_stream_resumes() {
        // A frame missing its end-of-data marker, then a valid one.
        let mut capture = vec![crate::packet::FRAME_START];
        capture.extend_from_slice(b"bad frame with no markers");
        capture.push(crate::packet::FRAME_END);
        capture.extend_from_slice(&build_frame(0, b"00:29     "));

        let channels =
            Driver::spawn(ReplayProvider::from_bytes(capture), DecodeOptions::default());
        let mut packets = channels.packets.subscribe();

        let packet = packets.recv().await.unwrap();
        assert_eq!(&packet.data.raw[..], b"00:29     ");
        channels.cancel.cancel();
    }
}
