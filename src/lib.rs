//! Type-safe Rust library for Daktronics All Sport RTD scoreboard data.
//!
//! Courtside reads the Real-Time Data (RTD) serial feed an All Sport console
//! transmits, reassembles it into frames, decodes each frame into a
//! positionally addressed packet, and routes packet windows into long-lived,
//! strongly typed field trees with per-field change notification.
//!
//! # Features
//!
//! - **Live consoles**: stream from a serial port at the console's 19200 8N1
//! - **Capture replay**: play back recorded byte streams at real-time pacing
//! - **Typed fields**: text, numeric, and flag fields with change events
//! - **Sport layouts**: ready-made basketball and volleyball schema trees
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use courtside::sports::Basketball;
//! use courtside::{Courtside, apply};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> courtside::Result<()> {
//!     let connection = Courtside::connect("/dev/ttyUSB0").await?;
//!     let mut packets = connection.packets();
//!
//!     let mut game = Basketball::new();
//!     while let Some(packet) = packets.next().await {
//!         if apply(&mut game, &packet) {
//!             println!(
//!                 "{:?} {:?}-{:?}",
//!                 game.clock.short.value(),
//!                 game.home.score.value(),
//!                 game.guest.score.value(),
//!             );
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod boolean_field;
mod error;
mod field;
mod packet;
mod schema;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Stream-based decode architecture
pub mod connection;
pub mod driver;
pub mod framer;
pub mod provider;
pub mod providers;

// Sport layouts
pub mod sports;

// Core exports
pub use boolean_field::BooleanField;
pub use error::{Result, RtdError};
pub use field::{Field, FieldChange, FieldSample, Justify};
pub use framer::Framer;
pub use packet::{
    DATA_END, DATA_START, DecodeOptions, FRAME_END, FRAME_START, HEADER_SEPARATOR, Header, Packet,
    Payload, frame_checksum,
};
pub use schema::{SchemaNode, apply};

// Main API exports
pub use connection::live::LiveConnection;
pub use connection::replay::ReplayConnection;

/// Unified entry point for console connections.
///
/// Both connection flavors expose the same stream surface; a replay behaves
/// like a live console, including pacing.
///
/// # Examples
///
/// ## Live console
/// ```rust,no_run
/// use courtside::Courtside;
///
/// #[tokio::main]
/// async fn main() -> courtside::Result<()> {
///     let connection = Courtside::connect("/dev/ttyUSB0").await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
///
/// ## Capture replay
/// ```rust,no_run
/// use courtside::Courtside;
///
/// #[tokio::main]
/// async fn main() -> courtside::Result<()> {
///     let connection = Courtside::open("game.rtd").await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
pub struct Courtside;

impl Courtside {
    /// Connect to a console on the given serial port.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened or configured.
    pub async fn connect(port_name: &str) -> Result<LiveConnection> {
        LiveConnection::connect(port_name).await
    }

    /// Open a recorded capture file for replay.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not readable.
    pub async fn open<P: AsRef<std::path::Path>>(path: P) -> Result<ReplayConnection> {
        ReplayConnection::open(path).await
    }
}
