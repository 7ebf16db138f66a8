//! Periodic report task
//!
//! Decodes the latest refresh once per interval and writes one text line
//! to UART0:
//!
//! ```text
//! V=12.05 A=1.23 W=45.6 Wh=789
//! ```
//!
//! The sentinel line (`-1` values) is sent when no complete refresh is
//! available.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;
use heapless::String;
use segtap_core::config::ReportConfig;
use segtap_core::{decode, MeterTap, RawDump, Report};

use crate::channels::FRAMES;

/// Longest line: the raw dump (16 x 8 bits plus separators)
const LINE_CAPACITY: usize = 160;

/// Report failures
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Line did not fit the buffer
    Format,
    /// UART write failed
    Uart,
}

/// Report task - prints one reading per interval
#[embassy_executor::task]
pub async fn report_task(mut tx: BufferedUartTx, config: ReportConfig) {
    info!("Report task started, interval {} ms", config.interval_ms);

    let meter = MeterTap::new(&FRAMES);
    let mut ticker = Ticker::every(Duration::from_millis(config.interval_ms as u64));

    loop {
        ticker.next().await;

        if let Err(e) = report_once(&mut tx, &meter, &config).await {
            warn!("Report failed: {:?}", e);
        }

        if config.log_capture_stats {
            let stats = FRAMES.stats();
            debug!(
                "capture: {} complete, {} short, {} overlong",
                stats.complete, stats.short, stats.overlong
            );
        }
    }
}

async fn report_once(
    tx: &mut BufferedUartTx,
    meter: &MeterTap<'_>,
    config: &ReportConfig,
) -> Result<(), ReportError> {
    // One extraction feeds both the reading and the raw dump
    let slots = meter.slots();
    let reading = slots.and_then(|s| decode(&s));

    if let Err(e) = reading {
        warn!("No reading: {:?}", e);
    }

    let mut line: String<LINE_CAPACITY> = String::new();
    write!(line, "{}\r\n", Report(reading)).map_err(|_| ReportError::Format)?;
    send(tx, &line).await?;

    if config.raw_dump {
        if let Ok(slots) = slots {
            line.clear();
            write!(line, "{}\r\n", RawDump(&slots)).map_err(|_| ReportError::Format)?;
            send(tx, &line).await?;
        }
    }

    Ok(())
}

async fn send(tx: &mut BufferedUartTx, line: &str) -> Result<(), ReportError> {
    tx.write_all(line.as_bytes())
        .await
        .map_err(|_| ReportError::Uart)
}
