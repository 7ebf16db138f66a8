//! Segtap - display-bus tap firmware
//!
//! Listens on the TM1621B segment driver bus inside a commodity power
//! meter, reconstructs the digits it shows and reports voltage, current,
//! power and energy over UART0 once per interval.
//!
//! Two executors:
//!
//! - Interrupt executor (SWI_IRQ_1): bus capture, woken per PIO word
//! - Thread executor: reporting and housekeeping
//!
//! CS, CLK and DATA are sampled by a PIO0 state machine, see [`bus`].

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use segtap_core::config::{parse_config, MeterConfig};

use crate::bus::BusCapture;
use crate::pins::PinBank;

/// Embedded tap configuration (compiled into firmware)
/// Edit meter.toml and rebuild to change pins or reporting
const EMBEDDED_CONFIG: &str = include_str!("../meter.toml");

mod bus;
mod channels;
mod pins;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

static EXECUTOR_CAPTURE: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_CAPTURE.on_interrupt()
}

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Segtap firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Bus: CS=gpio{} CLK=gpio{} DATA=gpio{}",
        config.bus.cs.pin, config.bus.clk.pin, config.bus.data.pin
    );

    let (mut bank, report_uart, pio0) = PinBank::new(p);

    // Report UART (115200 baud default); RX is unused but owned by the driver
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 16]);
    let uart = Uart::new_blocking(
        report_uart.uart,
        report_uart.tx,
        report_uart.rx,
        UartConfig::default(),
    );
    let (tx, _rx) = uart.into_buffered(Irqs, tx_buf, rx_buf).split();
    info!("UART initialized for reporting");

    let bus = (
        bank.input(config.bus.cs),
        bank.input(config.bus.clk),
        bank.input(config.bus.data),
    );
    let Pio { mut common, sm0, .. } = Pio::new(pio0, Irqs);
    match bus {
        (Ok(cs), Ok(clk), Ok(data)) => {
            let capture = BusCapture::new(&mut common, sm0, &config.bus, [cs, clk, data]);
            info!("PIO bus capture running");

            interrupt::SWI_IRQ_1.set_priority(Priority::P1);
            let capture_spawner = EXECUTOR_CAPTURE.start(interrupt::SWI_IRQ_1);
            capture_spawner
                .spawn(tasks::capture_task(capture))
                .unwrap();
        }
        (cs, clk, data) => {
            // Keep reporting sentinels so the UART side still sees the tap
            error!(
                "Bus pins unavailable: cs={:?} clk={:?} data={:?}",
                cs.err(),
                clk.err(),
                data.err()
            );
        }
    }

    spawner.spawn(tasks::report_task(tx, config.report)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        let stats = channels::FRAMES.stats();
        trace!("Main loop heartbeat, {} words captured", stats.total());
    }
}

/// Parse the embedded meter.toml
///
/// build.rs validates the file, so failure here means the firmware parser
/// and the build-time check disagree. Defaults are used in that case.
fn load_config() -> MeterConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            MeterConfig::default()
        }
    }
}
