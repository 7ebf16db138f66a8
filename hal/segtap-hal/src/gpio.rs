//! GPIO pin abstractions
//!
//! The tap never drives a line. Every signal is an input: DATA is sampled
//! by level, CS and CLK are consumed as edges.

/// Logic level read from a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level as the bit value it contributes to a captured word
    pub fn bit(self) -> u32 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Signal transition observed on an edge-triggered line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip. Reads must not block: they are issued from
/// the capture context once per clock edge.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Current level of the pin
    fn level(&self) -> Level {
        Level::from(self.is_high())
    }
}

impl<P: InputPin + ?Sized> InputPin for &P {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPin(bool);

    impl InputPin for FixedPin {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_level_from_pin() {
        assert_eq!(FixedPin(true).level(), Level::High);
        assert_eq!(FixedPin(false).level(), Level::Low);
        assert!(FixedPin(false).is_low());
    }

    #[test]
    fn test_level_bit() {
        assert_eq!(Level::High.bit(), 1);
        assert_eq!(Level::Low.bit(), 0);
    }

    #[test]
    fn test_reference_forwards() {
        let pin = FixedPin(true);
        let by_ref = &pin;
        assert!(by_ref.is_high());
    }
}
