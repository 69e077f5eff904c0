//! Ingestion loop
//!
//! Reads lines from a blocking source until it ends, parses each one and upserts
//! the result into the frame store. Malformed lines are counted and skipped;
//! the loop only stops when the input is exhausted.

use crate::config::MonitorConfig;
use crate::formats::{parse_line, LineFormat};
use crate::store::FrameStore;
use crate::types::{MonitorError, Result};
use serde::Serialize;
use std::fmt;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Health of the input stream as seen by readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Running,
    EndOfStream,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::Running => write!(f, "running"),
            StreamState::EndOfStream => write!(f, "!!!EOF!!!"),
        }
    }
}

/// Counters kept by the ingestion loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Lines read from the input, including malformed ones
    pub lines: u64,
    /// Frames parsed and stored
    pub frames: u64,
    /// Lines skipped because they did not parse
    pub malformed: u64,
    /// Frames parsed but dropped by the address filter
    pub filtered: u64,
}

#[derive(Debug, Default)]
struct Shared {
    end_of_stream: AtomicBool,
    lines: AtomicU64,
    frames: AtomicU64,
    malformed: AtomicU64,
    filtered: AtomicU64,
}

/// Shared handle to the ingestion status and counters
///
/// Written only by the ingestion loop; any number of readers may poll it.
#[derive(Debug, Clone, Default)]
pub struct IngestStatus {
    shared: Arc<Shared>,
}

impl IngestStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StreamState {
        if self.shared.end_of_stream.load(Ordering::Acquire) {
            StreamState::EndOfStream
        } else {
            StreamState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == StreamState::Running
    }

    pub fn stats(&self) -> IngestStats {
        IngestStats {
            lines: self.shared.lines.load(Ordering::Relaxed),
            frames: self.shared.frames.load(Ordering::Relaxed),
            malformed: self.shared.malformed.load(Ordering::Relaxed),
            filtered: self.shared.filtered.load(Ordering::Relaxed),
        }
    }

    fn mark_end_of_stream(&self) {
        self.shared.end_of_stream.store(true, Ordering::Release);
    }
}

/// Marks end of stream when dropped, so a panicking loop does not leave
/// readers waiting on a status that stays `Running`
struct EndOfStreamOnDrop<'a>(&'a IngestStatus);

impl Drop for EndOfStreamOnDrop<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("Ingestion aborted by a panic, marking end of stream");
        }
        self.0.mark_end_of_stream();
    }
}

/// Reads, parses and stores frames until the input ends
#[derive(Debug, Clone)]
pub struct IngestLoop {
    store: FrameStore,
    status: IngestStatus,
    config: MonitorConfig,
}

impl IngestLoop {
    pub fn new(store: FrameStore, status: IngestStatus, format: LineFormat) -> Self {
        Self::from_config(store, status, MonitorConfig::new().with_format(format))
    }

    /// Build a loop using the format and address filter from `config`
    pub fn from_config(store: FrameStore, status: IngestStatus, config: MonitorConfig) -> Self {
        Self {
            store,
            status,
            config,
        }
    }

    /// Run until the reader is exhausted and return the final counters
    ///
    /// A read error ends the loop the same way end of input does; the source
    /// is a single stream with no way to reconnect.
    pub fn run<R: BufRead>(&self, mut reader: R) -> IngestStats {
        log::info!("Ingestion started ({} format)", self.config.format);
        let end_of_stream = EndOfStreamOnDrop(&self.status);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    log::info!("End of input stream");
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    if let Err(e) = self.ingest_line(&line) {
                        log::debug!("Skipping line: {}", e);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("Input read failed, treating as end of stream: {}", e);
                    break;
                }
            }
        }

        drop(end_of_stream);
        let stats = self.status.stats();
        log::info!(
            "Ingestion stopped: {} lines, {} frames, {} malformed",
            stats.lines,
            stats.frames,
            stats.malformed
        );
        stats
    }

    /// Parse one line and store it, updating the counters
    pub fn ingest_line(&self, line: &str) -> Result<()> {
        self.status.shared.lines.fetch_add(1, Ordering::Relaxed);
        match parse_line(line, self.config.format) {
            Ok(frame) if !self.config.should_store(frame.address) => {
                self.status.shared.filtered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(frame) => {
                log::trace!("0x{:08x} {:02x?}", frame.address, frame.data);
                self.store.upsert(frame.address, frame.data);
                self.status.shared.frames.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.status.shared.malformed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Run the loop on a dedicated thread
    pub fn spawn<R>(self, reader: R) -> Result<JoinHandle<IngestStats>>
    where
        R: BufRead + Send + 'static,
    {
        thread::Builder::new()
            .name("ingest".to_string())
            .spawn(move || self.run(reader))
            .map_err(MonitorError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    /// Reader whose every read panics
    struct PanickingReader;

    impl Read for PanickingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("reader failed");
        }
    }

    fn ingest(input: &str) -> (FrameStore, IngestStatus, IngestStats) {
        let store = FrameStore::new();
        let status = IngestStatus::new();
        let stats = IngestLoop::new(store.clone(), status.clone(), LineFormat::Auto)
            .run(Cursor::new(input.to_string()));
        (store, status, stats)
    }

    #[test]
    fn test_status_starts_running() {
        let status = IngestStatus::new();
        assert_eq!(status.state(), StreamState::Running);
        assert!(status.is_running());
        assert_eq!(status.stats(), IngestStats::default());
    }

    #[test]
    fn test_malformed_line_does_not_stop_ingestion() {
        let (store, status, stats) = ingest(
            "x 123#01\ngarbage text no address\nx 456#0203\n",
        );

        assert_eq!(store.lookup(0x456).unwrap().data, vec![0x02, 0x03]);
        assert_eq!(store.len(), 2);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(status.state(), StreamState::EndOfStream);
    }

    #[test]
    fn test_oversized_length_is_skipped() {
        let (store, status, stats) = ingest("can0 123 [18446744073709551615] 00\nx 456#01\n");

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.frames, 1);
        assert!(store.lookup(0x123).is_none());
        assert_eq!(store.lookup(0x456).unwrap().data, vec![0x01]);
        assert_eq!(status.state(), StreamState::EndOfStream);
    }

    #[test]
    fn test_auto_keeps_verbose_line_with_hash_column() {
        let (store, _, stats) = ingest("can0 123 [1] 23 '#'\n");
        assert_eq!(stats.malformed, 0);
        assert_eq!(store.lookup(0x123).unwrap().data, vec![0x23]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let (store, _, stats) = ingest("x 123#01\nx 123#02");
        let frame = store.lookup(0x123).unwrap();
        assert_eq!(frame.data, vec![0x02]);
        assert_eq!(frame.previous, vec![0x01]);
        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn test_empty_input_ends_stream() {
        let (store, status, stats) = ingest("");
        assert!(store.is_empty());
        assert_eq!(stats.lines, 0);
        assert!(!status.is_running());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let store = FrameStore::new();
        let status = IngestStatus::new();
        let input: &[u8] = b"x 1\xff#00\nx 2#00\n";
        let stats = IngestLoop::new(store.clone(), status, LineFormat::Compact).run(input);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.frames, 1);
        assert!(store.lookup(0x2).is_some());
    }

    #[test]
    fn test_address_filter() {
        let store = FrameStore::new();
        let status = IngestStatus::new();
        let config = MonitorConfig::new().with_address_filter(vec![0x2]);
        let stats = IngestLoop::from_config(store.clone(), status, config)
            .run(Cursor::new("x 1#00\nx 2#00\n"));

        assert_eq!(stats.frames, 1);
        assert_eq!(stats.filtered, 1);
        assert!(store.lookup(0x1).is_none());
        assert!(store.lookup(0x2).is_some());
    }

    #[test]
    fn test_spawned_loop() {
        let store = FrameStore::new();
        let status = IngestStatus::new();
        let handle = IngestLoop::new(store.clone(), status.clone(), LineFormat::Verbose)
            .spawn(Cursor::new(b"can0 0a114005 [3] 46 04 05\n".to_vec()))
            .unwrap();

        let stats = handle.join().unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(status.state(), StreamState::EndOfStream);
        assert!(store.lookup(0x0a114005).is_some());
    }

    #[test]
    fn test_panic_in_loop_marks_end_of_stream() {
        let store = FrameStore::new();
        let status = IngestStatus::new();
        let reader = BufReader::new(Cursor::new(b"x 1#00\n".to_vec()).chain(PanickingReader));
        let handle = IngestLoop::new(store.clone(), status.clone(), LineFormat::Compact)
            .spawn(reader)
            .unwrap();

        assert!(handle.join().is_err());
        assert_eq!(status.state(), StreamState::EndOfStream);
        assert!(store.lookup(0x1).is_some());
    }
}
