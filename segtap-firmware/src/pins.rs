//! GPIO allocation by number
//!
//! Bus pins come from `meter.toml`, so they are handed out at runtime
//! from a bank instead of being named in code.

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::peripherals::{PIN_0, PIN_1, PIO0, UART0};
use embassy_rp::{Peri, Peripherals};
use segtap_core::config::{PinConfig, GPIO_COUNT};

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the report UART
    Reserved,
}

/// UART0 and its default pins, kept out of the bank
pub struct ReportUart {
    pub uart: Peri<'static, UART0>,
    pub tx: Peri<'static, PIN_0>,
    pub rx: Peri<'static, PIN_1>,
}

/// Bank holding GPIO 2-29 for config-driven assignment
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Split the peripherals into the report UART, the capture PIO block
    /// and a bank of free pins
    pub fn new(p: Peripherals) -> (Self, ReportUart, Peri<'static, PIO0>) {
        let bank = Self {
            pins: [
                None,
                None,
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let uart = ReportUart {
            uart: p.UART0,
            tx: p.PIN_0,
            rx: p.PIN_1,
        };
        (bank, uart, p.PIO0)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        match pin_num {
            0 | 1 => Err(PinError::Reserved),
            n if n >= GPIO_COUNT => Err(PinError::InvalidPin),
            n => self.pins[n as usize].take().ok_or(PinError::AlreadyTaken),
        }
    }

    /// Take a pin and configure it as an input
    pub fn input(&mut self, cfg: PinConfig) -> Result<Input<'static>, PinError> {
        let pull = if cfg.pull_up { Pull::Up } else { Pull::None };
        Ok(Input::new(self.take(cfg.pin)?, pull))
    }
}
