//! CAN Monitor Library
//!
//! Live monitoring core for a vehicle CAN bus: parses text dumps of bus frames,
//! keeps the latest and previous payload for every address, and decodes a fixed
//! set of well-known addresses into readable signals.
//!
//! # Architecture
//!
//! - [`formats`] turns one dump line into a [`RawFrame`]
//! - [`FrameStore`] is the shared address -> (current, previous) table
//! - [`signals`] holds the decoders and the address -> decoder registry
//! - [`IngestLoop`] feeds lines from a reader into the store until input ends
//! - [`RefreshLoop`] drives the presentation side on a fixed tick
//!
//! The ingestion side and the presentation side share nothing but a
//! [`FrameStore`] and an [`IngestStatus`] handle. Rendering is left to the
//! application layer (can-monitor-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use can_monitor::{FrameStore, IngestLoop, IngestStatus, LineFormat, SignalRegistry};
//! use std::io;
//!
//! let store = FrameStore::new();
//! let status = IngestStatus::new();
//!
//! IngestLoop::new(store.clone(), status.clone(), LineFormat::Auto)
//!     .spawn(io::BufReader::new(io::stdin()))
//!     .unwrap();
//!
//! let registry = SignalRegistry::standard();
//! let signals = registry.decode_frames(&store.snapshot());
//! println!("LCD: {}", signals.lcd_text());
//! ```

// Public modules
pub mod config;
pub mod formats;
pub mod ingest;
pub mod refresh;
pub mod signals;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config::MonitorConfig;
pub use formats::{parse_line, LineFormat};
pub use ingest::{IngestLoop, IngestStats, IngestStatus, StreamState};
pub use refresh::RefreshLoop;
pub use signals::{DecodedSignals, SignalKind, SignalRegistry};
pub use store::FrameStore;
pub use types::{Frame, MonitorError, RawFrame, Result, SignalValue, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
