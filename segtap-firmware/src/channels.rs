//! State shared between the capture and report executors
//!
//! The frame buffer is written only by the capture task; the report task
//! reads it through snapshots, so no mutex is involved.

use segtap_core::FrameBuffer;

/// Ring of captured bus words
pub static FRAMES: FrameBuffer = FrameBuffer::new();
