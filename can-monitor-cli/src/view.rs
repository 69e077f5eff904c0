//! Text rendering of a store snapshot
//!
//! One row per address with hex and ASCII columns, changed bytes highlighted,
//! followed by the decoded signal panes.

use can_monitor::{DecodedSignals, Frame, IngestStats, SignalKind, StreamState};
use crossterm::style::Stylize;
use serde::Serialize;

/// Width of the hex column: 8 bytes of "xx " plus two spaces of gutter
const HEX_COLUMN_WIDTH: usize = 3 * 8 + 2;

/// How changed bytes are marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// ANSI colour (green)
    Color,
    /// Trailing `*` after the hex byte, for output without escape codes
    Marker,
}

/// Everything one refresh needs to draw
pub struct View<'a> {
    pub frames: &'a [Frame],
    pub signals: &'a DecodedSignals,
    pub state: StreamState,
    pub stats: IngestStats,
}

impl View<'_> {
    /// Render the full view as lines of text
    pub fn render(&self, highlight: Highlight) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.frames.len() + 4);
        lines.push(self.info_line());
        lines.push(self.signal_line());
        lines.push(String::new());
        lines.extend(self.frames.iter().map(|f| frame_row(f, highlight)));
        lines
    }

    fn info_line(&self) -> String {
        format!(
            "Info: {} | lines {} | frames {} | malformed {} | addresses {}",
            self.state,
            self.stats.lines,
            self.stats.frames,
            self.stats.malformed,
            self.frames.len()
        )
    }

    fn signal_line(&self) -> String {
        format!(
            "LCD: [{}] | {}: [{}] | {}: [{}] | {}: [{}]",
            self.signals.lcd_text(),
            SignalKind::Buttons,
            self.signals.get(SignalKind::Buttons),
            SignalKind::Date,
            self.signals.get(SignalKind::Date),
            SignalKind::Brake,
            self.signals.get(SignalKind::Brake),
        )
    }
}

/// `0x0a194005: 48 65 6c ...   Hel...`
pub fn frame_row(frame: &Frame, highlight: Highlight) -> String {
    let changed = frame.changed_bytes();
    let mut line = format!("0x{:08x}: ", frame.address);

    let mut pad = HEX_COLUMN_WIDTH;
    for (byte, &is_changed) in frame.data.iter().zip(&changed) {
        let cell = match (highlight, is_changed) {
            (Highlight::Color, true) => format!("{:02x} ", byte).green().to_string(),
            (Highlight::Marker, true) => format!("{:02x}*", byte),
            (_, false) => format!("{:02x} ", byte),
        };
        line.push_str(&cell);
        pad = pad.saturating_sub(3);
    }
    line.extend(std::iter::repeat(' ').take(pad));

    for (&byte, &is_changed) in frame.data.iter().zip(&changed) {
        let c = if (0x20..0x7f).contains(&byte) {
            char::from(byte)
        } else {
            '.'
        };
        if highlight == Highlight::Color && is_changed {
            line.push_str(&c.green().to_string());
        } else {
            line.push(c);
        }
    }

    line
}

/// Machine-readable form of one refresh
#[derive(Serialize)]
pub struct JsonView<'a> {
    pub state: StreamState,
    pub stats: IngestStats,
    pub frames: &'a [Frame],
    pub signals: &'a DecodedSignals,
}

impl<'a> From<&View<'a>> for JsonView<'a> {
    fn from(view: &View<'a>) -> Self {
        Self {
            state: view.state,
            stats: view.stats,
            frames: view.frames,
            signals: view.signals,
        }
    }
}
