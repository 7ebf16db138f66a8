//! Ring of captured bus words
//!
//! One slot per chip-select interval, written by a single producer (the
//! capture context) and read by the report context via [`Snapshot`].
//!
//! There is no lock. The producer counts closed words in `written`; a
//! snapshot reads that counter before and after copying the slots and
//! drops every slot the producer may have touched in between. If the
//! producer lapped the ring during the copy the snapshot is empty.
//!
//! The slot under the cursor holds the oldest complete word while the bus
//! is idle and a partial word while an interval is open. `open` tells the
//! two apart.

use portable_atomic::{fence, AtomicBool, AtomicU32, AtomicUsize, Ordering};

use segtap_protocol::WORD_BITS;

/// Number of words kept in the ring
pub const FRAME_CAPACITY: usize = 32;

/// Counters describing how chip-select intervals ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureStats {
    /// Intervals that carried exactly one word's worth of clock edges
    pub complete: u32,
    /// Intervals with fewer clock edges than a word has bits
    pub short: u32,
    /// Intervals with more clock edges than a word has bits
    pub overlong: u32,
}

impl CaptureStats {
    /// Total closed intervals
    pub fn total(&self) -> u32 {
        self.complete
            .wrapping_add(self.short)
            .wrapping_add(self.overlong)
    }
}

/// Fixed-capacity ring shared between capture and report contexts
pub struct FrameBuffer {
    words: [AtomicU32; FRAME_CAPACITY],
    /// Words closed since reset (wrapping); the cursor is this mod capacity
    written: AtomicUsize,
    /// Set while the slot under the cursor is being clocked in
    open: AtomicBool,
    complete: AtomicU32,
    short: AtomicU32,
    overlong: AtomicU32,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create an empty ring (usable in a `static`)
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(0) }; FRAME_CAPACITY],
            written: AtomicUsize::new(0),
            open: AtomicBool::new(false),
            complete: AtomicU32::new(0),
            short: AtomicU32::new(0),
            overlong: AtomicU32::new(0),
        }
    }

    /// Slot the next (or in-progress) word is written to
    pub fn cursor(&self) -> usize {
        self.written.load(Ordering::Acquire) % FRAME_CAPACITY
    }

    fn slot(&self) -> &AtomicU32 {
        &self.words[self.written.load(Ordering::Relaxed) % FRAME_CAPACITY]
    }

    /// Zero the slot under the cursor for a new word
    pub(crate) fn open_word(&self) {
        self.open.store(true, Ordering::Relaxed);
        // Flag must be visible before the slot changes
        fence(Ordering::Release);
        self.slot().store(0, Ordering::Relaxed);
    }

    /// Store the partial word accumulated so far
    pub(crate) fn store_word(&self, word: u32) {
        self.slot().store(word, Ordering::Relaxed);
    }

    /// Close the word under the cursor and move to the next slot
    ///
    /// `edges` is the number of clock edges seen during the interval.
    pub(crate) fn close_word(&self, edges: u8) {
        let counter = match (edges as u32).cmp(&WORD_BITS) {
            core::cmp::Ordering::Less => &self.short,
            core::cmp::Ordering::Equal => &self.complete,
            core::cmp::Ordering::Greater => &self.overlong,
        };
        bump(counter);

        let written = self.written.load(Ordering::Relaxed).wrapping_add(1);
        self.written.store(written, Ordering::Release);
        self.open.store(false, Ordering::Release);
        // Counter update must be visible before any write into the next slot
        fence(Ordering::Release);
    }

    /// Copy the ring out for decoding
    pub fn snapshot(&self) -> Snapshot {
        let before = self.written.load(Ordering::Acquire);
        let open_before = self.open.load(Ordering::Relaxed);
        let mut words = [0u32; FRAME_CAPACITY];
        for (dst, src) in words.iter_mut().zip(self.words.iter()) {
            *dst = src.load(Ordering::Relaxed);
        }
        fence(Ordering::Acquire);
        // Seeing a closed flag here implies seeing the counter it closed
        let open_after = self.open.load(Ordering::Acquire);
        let after = self.written.load(Ordering::Relaxed);

        // Slots before..=after may have changed under the copy. The slot at
        // `after` is only trusted when nothing moved and no word was open.
        let touched = after.wrapping_sub(before);
        let idle = touched == 0 && !open_before && !open_after;
        Snapshot {
            words,
            cursor: after % FRAME_CAPACITY,
            first: if idle { 0 } else { 1 },
            settled: if idle {
                FRAME_CAPACITY
            } else {
                (FRAME_CAPACITY - 1).saturating_sub(touched)
            },
        }
    }

    /// True while a word is being clocked into the cursor slot
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Current capture counters
    pub fn stats(&self) -> CaptureStats {
        CaptureStats {
            complete: self.complete.load(Ordering::Relaxed),
            short: self.short.load(Ordering::Relaxed),
            overlong: self.overlong.load(Ordering::Relaxed),
        }
    }
}

// Single writer, so load + store is enough and stays native on thumbv6m.
fn bump(counter: &AtomicU32) {
    counter.store(counter.load(Ordering::Relaxed).wrapping_add(1), Ordering::Relaxed);
}

/// Immutable copy of the ring taken at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    words: [u32; FRAME_CAPACITY],
    cursor: usize,
    /// Offset from the cursor of the oldest trusted slot
    first: usize,
    /// Oldest-first words known to be consistent
    settled: usize,
}

impl Snapshot {
    /// Build a snapshot from recorded words
    ///
    /// `cursor` is the slot the sampler would write next. The bus is taken
    /// to be idle, so the word under the cursor is the oldest one.
    pub fn from_words(words: [u32; FRAME_CAPACITY], cursor: usize) -> Self {
        Self {
            words,
            cursor: cursor % FRAME_CAPACITY,
            first: 0,
            settled: FRAME_CAPACITY,
        }
    }

    /// Raw slots in physical order
    pub fn words(&self) -> &[u32; FRAME_CAPACITY] {
        &self.words
    }

    /// Write cursor at the time of the copy
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Captured words, oldest first
    ///
    /// The slot under the cursor is skipped if a word was being clocked in
    /// when the copy was taken. Slots rewritten during the copy are skipped
    /// too.
    pub fn chronological(&self) -> impl Iterator<Item = u32> + '_ {
        (self.first..FRAME_CAPACITY)
            .take(self.settled)
            .map(move |i| self.words[(self.cursor + i) % FRAME_CAPACITY])
    }
}
