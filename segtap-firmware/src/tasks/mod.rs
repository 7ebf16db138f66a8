//! Embassy async tasks
//!
//! The capture task runs on the interrupt executor so draining the PIO
//! FIFO preempts reporting; the report task runs on the thread executor.

pub mod capture;
pub mod report;

pub use capture::capture_task;
pub use report::report_task;
