//! Sequence extraction and digit decoding
//!
//! Pull-side pipeline, run on demand from the report context:
//!
//! ```text
//! Snapshot ──► extract_sequence ──► DigitSlots ──► decode ──► Reading
//! ```

pub mod digits;
pub mod error;
pub mod extract;

pub use digits::{decode, DigitSlots, Quantity, Reading};
pub use error::DecodeError;
pub use extract::extract_sequence;

use crate::capture::Snapshot;

/// Extract and decode one snapshot
///
/// All four quantities come from the same display refresh.
pub fn read(snapshot: &Snapshot) -> Result<Reading, DecodeError> {
    let slots = extract_sequence(snapshot.chronological())?;
    decode(&slots)
}
