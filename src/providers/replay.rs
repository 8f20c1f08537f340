//! Replay provider for raw capture files.
//!
//! A capture is the raw byte stream as read off the serial port (for example
//! recorded with `cat /dev/ttyUSB0 > game.rtd`). Playback slices it into
//! fixed-size chunks and paces them on an interval so downstream behavior
//! matches a live console.

use std::path::Path;

use bytes::Bytes;
use tokio::time::{Duration, Instant, Interval, interval_at};
use tracing::{debug, info};

use crate::provider::Provider;
use crate::{Result, RtdError};

const DEFAULT_CHUNK_SIZE: usize = 64;
const DEFAULT_CHUNK_INTERVAL: Duration = Duration::from_millis(10);

/// Provider that plays back a recorded byte capture.
pub struct ReplayProvider {
    data: Bytes,
    pos: usize,
    chunk_size: usize,
    chunk_interval: Duration,
    interval: Interval,
    speed: f64,
}

impl ReplayProvider {
    /// Load a capture file for playback.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| RtdError::Capture { path: path.to_path_buf(), source: e })?;

        info!(path = %path.display(), bytes = data.len(), "opened capture file");

        Ok(Self::from_bytes(data))
    }

    /// Play back an in-memory capture.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_interval: DEFAULT_CHUNK_INTERVAL,
            interval: paced(DEFAULT_CHUNK_INTERVAL),
            speed: 1.0,
        }
    }

    /// Set playback speed (1.0 = as recorded).
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.1, 10.0);
        self.interval = paced(self.chunk_interval.div_f64(self.speed));
        debug!("playback speed set to {}x", self.speed);
    }

    /// Fraction of the capture already delivered, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.data.is_empty() {
            1.0
        } else {
            self.pos as f64 / self.data.len() as f64
        }
    }
}

/// An interval whose first tick fires one period from now, not immediately.
/// Gives subscribers a beat to attach before the first chunk flows.
fn paced(period: Duration) -> Interval {
    interval_at(Instant::now() + period, period)
}

#[async_trait::async_trait]
impl Provider for ReplayProvider {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.pos >= self.data.len() {
            debug!("reached end of capture");
            return Ok(None);
        }

        self.interval.tick().await;

        let end = (self.pos + self.chunk_size).min(self.data.len());
        let chunk = self.data.slice(self.pos..end);
        self.pos = end;

        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plays_capture_in_order_and_ends() {
        let data: Vec<u8> = (0..150).map(|i| (i % 251) as u8).collect();
        let mut provider = ReplayProvider::from_bytes(data.clone());

        let mut replayed = Vec::new();
        while let Some(chunk) = provider.next_chunk().await.unwrap() {
            replayed.extend_from_slice(&chunk);
        }

        assert_eq!(replayed, data);
        assert_eq!(provider.progress(), 1.0);
    }

    #[tokio::test]
    async fn empty_capture_ends_immediately() {
        let mut provider = ReplayProvider::from_bytes(Vec::new());
        assert!(provider.next_chunk().await.unwrap().is_none());
    }
}
