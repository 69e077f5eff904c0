//! Address -> decoder registry

use super::{body, clock, radio, SignalKind};
use crate::store::FrameStore;
use crate::types::{Frame, SignalValue};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

static EMPTY: SignalValue = SignalValue::Empty;

/// A pure decoder from payload bytes to a signal value
pub type DecodeFn = fn(&[u8]) -> SignalValue;

#[derive(Clone, Copy)]
struct Entry {
    kind: SignalKind,
    decode: DecodeFn,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Maps well-known addresses to their decoders
#[derive(Debug, Clone, Default)]
pub struct SignalRegistry {
    decoders: HashMap<u32, Entry>,
}

impl SignalRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in decoder at its standard address
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(SignalKind::RadioText, radio::decode_radio_text);
        registry.register(SignalKind::Frequency, radio::decode_frequency);
        registry.register(SignalKind::Buttons, body::decode_buttons);
        registry.register(SignalKind::Date, clock::decode_date);
        registry.register(SignalKind::Brake, body::decode_brake);
        registry
    }

    /// Register a decoder at the signal's standard address
    pub fn register(&mut self, kind: SignalKind, decode: DecodeFn) {
        self.register_at(kind.address(), kind, decode);
    }

    /// Register a decoder at an explicit address, replacing any previous one
    pub fn register_at(&mut self, address: u32, kind: SignalKind, decode: DecodeFn) {
        if let Some(old) = self.decoders.insert(address, Entry { kind, decode }) {
            log::debug!(
                "Replaced {} decoder at 0x{:08x} with {}",
                old.kind,
                address,
                kind
            );
        }
    }

    /// Number of registered decoders
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Signal kind registered for an address
    pub fn kind_of(&self, address: u32) -> Option<SignalKind> {
        self.decoders.get(&address).map(|e| e.kind)
    }

    /// Decode one frame if its address is registered
    pub fn decode_frame(&self, frame: &Frame) -> Option<(SignalKind, SignalValue)> {
        self.decoders
            .get(&frame.address)
            .map(|e| (e.kind, (e.decode)(&frame.data)))
    }

    /// Decode every registered signal found in a snapshot
    pub fn decode_frames(&self, frames: &[Frame]) -> DecodedSignals {
        let mut decoded = DecodedSignals::default();
        for frame in frames {
            if let Some((kind, value)) = self.decode_frame(frame) {
                decoded.values.insert(kind, value);
            }
        }
        decoded
    }

    /// Decode every registered signal by looking up its address in the store
    pub fn decode_store(&self, store: &FrameStore) -> DecodedSignals {
        let mut decoded = DecodedSignals::default();
        for (&address, entry) in &self.decoders {
            if let Some(frame) = store.lookup(address) {
                decoded.values.insert(entry.kind, (entry.decode)(&frame.data));
            }
        }
        decoded
    }
}

/// Decoded values for one refresh cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedSignals {
    values: BTreeMap<SignalKind, SignalValue>,
}

impl DecodedSignals {
    /// Value of a signal; `Empty` if its address has not been seen
    pub fn get(&self, kind: SignalKind) -> &SignalValue {
        self.values.get(&kind).unwrap_or(&EMPTY)
    }

    /// Text for the head unit display: radio text followed by frequency / track
    pub fn lcd_text(&self) -> String {
        format!(
            "{} {}",
            self.get(SignalKind::RadioText),
            self.get(SignalKind::Frequency)
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SignalKind, &SignalValue)> {
        self.values.iter()
    }
}
