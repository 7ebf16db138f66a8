//! Bus capture task
//!
//! Drains the PIO RX FIFO into the frame buffer. The state machine does the
//! edge work; this task only has to keep up with one word per interval.

use defmt::*;
use segtap_core::BitSampler;

use crate::bus::BusCapture;
use crate::channels::FRAMES;

/// Capture task - records one word per chip-select interval
#[embassy_executor::task]
pub async fn capture_task(mut bus: BusCapture) {
    info!("Capture task started");

    let mut sampler = BitSampler::new(&FRAMES);

    loop {
        let marked = bus.next_word().await;
        sampler.replay(marked);
        trace!("word closed after {} edges", sampler.position());
    }
}
