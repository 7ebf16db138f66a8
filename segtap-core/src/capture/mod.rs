//! Bus capture
//!
//! The sampler runs in the capture context and is the only writer of the
//! frame buffer. Everything else reads the buffer through snapshots.

pub mod frame_buffer;
pub mod sampler;

pub use frame_buffer::{CaptureStats, FrameBuffer, Snapshot, FRAME_CAPACITY};
pub use sampler::{BitSampler, MARKED_MAX_EDGES};
