//! Segtap Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the bus tap needs
//! from a chip-specific HAL. The capture logic in `segtap-core` is written
//! against these traits so it can run unchanged on the target and against
//! scripted pins in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  segtap-firmware (embassy tasks)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  segtap-core (sampler, decoder)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  segtap-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Level-sampled digital input (the DATA line)
//! - [`gpio::Edge`] - Edge kinds reported by the CS and CLK lines

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key traits at crate root for convenience
pub use gpio::{Edge, InputPin, Level};
