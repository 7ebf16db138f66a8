//! PIO capture of the display bus
//!
//! One state machine follows CS, CLK and DATA and pushes one marked word
//! per chip-select interval (layout in [`BitSampler::replay`]):
//!
//! ```text
//! idle:     wait 0 gpio CS
//!           set x, 1
//!           mov isr, x            ; marker
//!           set y, 30             ; samples left before saturation
//! clk_high: <x = !CS>
//!           jmp !x, release
//!           <x = CLK>
//!           jmp !x, clk_low
//!           jmp clk_high
//! clk_low:  <x = !CS>
//!           jmp !x, release
//!           <x = CLK>
//!           jmp !x, clk_low
//!           mov osr, pins         ; rising edge: sample DATA
//!           out null, DATA
//!           in osr, 1
//!           jmp y--, clk_high
//!           wait 1 gpio CS        ; saturated, drop the rest
//! release:  push block
//! ```
//!
//! `<x = PIN>` is `mov osr, pins` (inverted for CS), `out null, PIN`,
//! `out x, 1`. Pin numbers come from `meter.toml`, so the program is built
//! at runtime with the `pio` assembler instead of `pio_asm!`.
//!
//! [`BitSampler::replay`]: segtap_core::BitSampler::replay

use embassy_rp::gpio::Input;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Common, Config, FifoJoin, ShiftConfig, ShiftDirection, StateMachine};
use pio::{
    Assembler, InSource, JmpCondition, Label, MovDestination, MovOperation, MovSource,
    OutDestination, Program, SetDestination, WaitSource,
};
use segtap_core::config::BusConfig;
use segtap_core::MARKED_MAX_EDGES;

/// Instruction memory of one PIO block
const PROGRAM_SIZE: usize = 32;

/// Bus lines owned by a running capture state machine
pub struct BusCapture {
    sm: StateMachine<'static, PIO0, 0>,
    // Held so the pads stay configured as inputs with their pulls
    _lines: [Input<'static>; 3],
}

impl BusCapture {
    /// Load the capture program and start the state machine
    ///
    /// `lines` are the CS, CLK and DATA inputs named by `bus`.
    pub fn new(
        common: &mut Common<'static, PIO0>,
        mut sm: StateMachine<'static, PIO0, 0>,
        bus: &BusConfig,
        lines: [Input<'static>; 3],
    ) -> Self {
        let program = capture_program(bus.cs.pin, bus.clk.pin, bus.data.pin);
        let installed = common.load_program(&program);

        // `mov osr, pins` reads from GPIO 0 upward; pins are picked by
        // shifting OSR right, samples enter ISR from the right
        let mut cfg = Config::default();
        cfg.use_program(&installed, &[]);
        cfg.shift_in = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Left,
            auto_fill: false,
        };
        cfg.shift_out = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Right,
            auto_fill: false,
        };
        cfg.fifo_join = FifoJoin::RxOnly;

        sm.set_config(&cfg);
        sm.set_enable(true);

        Self { sm, _lines: lines }
    }

    /// Wait for the next closed interval
    pub async fn next_word(&mut self) -> u32 {
        self.sm.rx().wait_pull().await
    }
}

fn capture_program(cs: u8, clk: u8, data: u8) -> Program<PROGRAM_SIZE> {
    let mut a = Assembler::<PROGRAM_SIZE>::new();
    let mut idle = a.label();
    let mut clk_high = a.label();
    let mut clk_low = a.label();
    let mut release = a.label();
    let mut wrap_source = a.label();

    a.bind(&mut idle);
    a.wait(0, WaitSource::GPIO, cs, false);
    a.set(SetDestination::X, 1);
    a.mov(MovDestination::ISR, MovOperation::None, MovSource::X);
    a.set(SetDestination::Y, MARKED_MAX_EDGES - 1);

    a.bind(&mut clk_high);
    jmp_if_released(&mut a, cs, &mut release);
    read_pin(&mut a, clk, false);
    a.jmp(JmpCondition::XIsZero, &mut clk_low);
    a.jmp(JmpCondition::Always, &mut clk_high);

    a.bind(&mut clk_low);
    jmp_if_released(&mut a, cs, &mut release);
    read_pin(&mut a, clk, false);
    a.jmp(JmpCondition::XIsZero, &mut clk_low);
    a.mov(MovDestination::OSR, MovOperation::None, MovSource::PINS);
    skip_pins(&mut a, data);
    a.in_(InSource::OSR, 1);
    a.jmp(JmpCondition::YDecNonZero, &mut clk_high);
    a.wait(1, WaitSource::GPIO, cs, false);

    a.bind(&mut release);
    a.push(false, true);
    a.bind(&mut wrap_source);

    a.assemble_with_wrap(wrap_source, idle)
}

/// x := level of `pin` (inverted if asked)
fn read_pin(a: &mut Assembler<PROGRAM_SIZE>, pin: u8, inverted: bool) {
    let op = if inverted {
        MovOperation::Invert
    } else {
        MovOperation::None
    };
    a.mov(MovDestination::OSR, op, MovSource::PINS);
    skip_pins(a, pin);
    a.out(OutDestination::X, 1);
}

// A bit count of 0 encodes 32, so GPIO 0 needs no shift at all
fn skip_pins(a: &mut Assembler<PROGRAM_SIZE>, pin: u8) {
    if pin > 0 {
        a.out(OutDestination::NULL, pin);
    }
}

fn jmp_if_released(a: &mut Assembler<PROGRAM_SIZE>, cs: u8, release: &mut Label) {
    read_pin(a, cs, true);
    a.jmp(JmpCondition::XIsZero, release);
}
