//! GPIO Abstractions
//!
//! Status indication for the TNC. Generic over `embedded-hal` output pins
//! so the same driver works on any board.

use embedded_hal::digital::OutputPin;

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// Status LED driver
///
/// Lit once the core is up; blinks off for one loop iteration on each
/// frame moved in either direction.
pub struct StatusLed<P> {
    pin: P,
    state: LedState,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create a new status LED (initially off)
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self {
            pin,
            state: LedState::Off,
        }
    }

    /// Turn LED on
    pub fn on(&mut self) {
        let _ = self.pin.set_high();
        self.state = LedState::On;
    }

    /// Turn LED off
    pub fn off(&mut self) {
        let _ = self.pin.set_low();
        self.state = LedState::Off;
    }

    /// Show frame activity: off while `active`, on otherwise
    pub fn activity(&mut self, active: bool) {
        match (active, self.state) {
            (true, LedState::On) => self.off(),
            (false, LedState::Off) => self.on(),
            _ => {}
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }
}
