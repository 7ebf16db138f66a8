//! Edge-driven bit sampler
//!
//! Folds DATA samples into the word under the frame buffer cursor:
//!
//! ```text
//! CS   ‾‾\________________________________/‾‾‾
//! CLK  ____/‾\_/‾\_/‾\ … _/‾\_/‾\_______________
//! bit       16  15  14 …   1   0
//! ```
//!
//! The n-th clock edge (counting from 0) lands in bit `16 - n`. An
//! interval with more than 17 edges has no position for the extra
//! samples; they are dropped rather than wrapping the shift.
//!
//! Intervals shifted in by hardware arrive as one marked word and go
//! through [`BitSampler::replay`].

use segtap_hal::{Edge, InputPin, Level};
use segtap_protocol::WORD_BITS;

use super::frame_buffer::FrameBuffer;

/// Highest bit position, written by the first sample
const TOP_BIT: u8 = (WORD_BITS - 1) as u8;

/// Most edges a marked word can carry; the marker then sits in bit 31
pub const MARKED_MAX_EDGES: u8 = 31;

/// Capture-side state machine
///
/// Call [`chip_select`](Self::chip_select) on both CS edges and
/// [`clock`](Self::clock) on every rising CLK edge. Handlers never block
/// and must run to completion before the next edge is delivered.
pub struct BitSampler<'a> {
    frames: &'a FrameBuffer,
    /// Clock edges seen in the current interval
    position: u8,
    /// Word accumulated in the current interval
    word: u32,
    selected: bool,
}

impl<'a> BitSampler<'a> {
    /// Create a sampler writing into `frames`
    pub const fn new(frames: &'a FrameBuffer) -> Self {
        Self {
            frames,
            position: 0,
            word: 0,
            selected: false,
        }
    }

    /// Handle a chip-select edge (CS is active low)
    pub fn chip_select(&mut self, edge: Edge) {
        match edge {
            Edge::Falling => self.select(),
            Edge::Rising => self.deselect(),
        }
    }

    /// CS asserted: start a new word in the slot under the cursor
    ///
    /// A second assertion without a release restarts the same slot.
    pub fn select(&mut self) {
        self.position = 0;
        self.word = 0;
        self.frames.open_word();
        self.selected = true;
    }

    /// Rising CLK edge: sample DATA into the current word
    ///
    /// Ignored while CS is released.
    pub fn clock<P: InputPin>(&mut self, data: &P) {
        if self.selected {
            self.sample(data.level());
        }
    }

    /// Fold one sampled level into the current word
    pub fn sample(&mut self, level: Level) {
        if !self.selected {
            return;
        }
        if let Some(shift) = TOP_BIT.checked_sub(self.position) {
            self.word |= level.bit() << shift;
            self.frames.store_word(self.word);
        }
        self.position = self.position.saturating_add(1);
    }

    /// CS released: close the word and advance the cursor
    ///
    /// A release without a preceding assertion is ignored.
    pub fn deselect(&mut self) {
        if !self.selected {
            return;
        }
        self.selected = false;
        self.frames.close_word(self.position);
    }

    /// Record a whole interval shifted in elsewhere
    ///
    /// `marked` holds one sample per clock edge, first sample highest, with
    /// a single 1 bit directly above the first sample. An interval that saw
    /// [`MARKED_MAX_EDGES`] or more edges keeps only its first samples. A
    /// word without a marker carries no interval and is ignored.
    pub fn replay(&mut self, marked: u32) {
        let Some(edges) = marked.checked_ilog2() else {
            return;
        };
        self.select();
        for bit in (0..edges).rev() {
            self.sample(Level::from((marked >> bit) & 1 == 1));
        }
        self.deselect();
    }

    /// Whether a transaction is in progress
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Clock edges seen in the current (or last) interval
    pub fn position(&self) -> u8 {
        self.position
    }
}
