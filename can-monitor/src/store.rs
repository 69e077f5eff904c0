//! Concurrent frame store
//!
//! Keeps the current and previous payload for every address seen on the bus.
//! The store is the only state shared between the ingestion thread and the
//! presentation thread; cloning a [`FrameStore`] clones the handle, not the table.

use crate::types::Frame;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Table {
    /// Frames in first-seen order
    frames: Vec<Frame>,
    /// Address -> position in `frames`
    index: HashMap<u32, usize>,
}

/// Shared handle to the address -> (current, previous) table
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    inner: Arc<RwLock<Table>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new address or update an existing one
    ///
    /// For a known address the current payload moves into `previous` before the
    /// new payload is written. Both happen under one write lock, so readers never
    /// see a half-updated frame.
    pub fn upsert(&self, address: u32, data: Vec<u8>) {
        let mut table = self.inner.write();
        match table.index.get(&address).copied() {
            Some(pos) => table.frames[pos].update(data),
            None => {
                log::debug!("New address 0x{:08x} ({} bytes)", address, data.len());
                let pos = table.frames.len();
                table.frames.push(Frame::first_seen(address, data));
                table.index.insert(address, pos);
            }
        }
    }

    /// Copy of every frame in first-seen order
    pub fn snapshot(&self) -> Vec<Frame> {
        self.inner.read().frames.clone()
    }

    /// Copy of the frame for one address, if it has been seen
    pub fn lookup(&self, address: u32) -> Option<Frame> {
        let table = self.inner.read();
        table
            .index
            .get(&address)
            .map(|&pos| table.frames[pos].clone())
    }

    /// Number of distinct addresses seen
    pub fn len(&self) -> usize {
        self.inner.read().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
