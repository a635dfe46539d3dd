//! Indicator output driven by `INDICATOR_SET`.

use embedded_hal_1::digital::{OutputPin, PinState};

/// A binary output the dispatcher can drive.
pub trait Indicator {
    type Error: core::fmt::Debug;

    /// Put the output into a known state. Called once during startup.
    fn configure_output(&mut self) -> Result<(), Self::Error>;

    /// Drive the output high (`true`) or low (`false`).
    fn set_output(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// [`Indicator`] backed by a GPIO output pin, e.g. an LED.
pub struct PinIndicator<P> {
    pin: P,
    initial: PinState,
}

impl<P: OutputPin> PinIndicator<P> {
    /// Bind `pin`. It is driven high when configured.
    pub fn new(pin: P) -> Self {
        Self::with_initial_state(pin, PinState::High)
    }

    /// Bind `pin` with an explicit level applied by `configure_output`.
    pub fn with_initial_state(pin: P, initial: PinState) -> Self {
        Self { pin, initial }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Indicator for PinIndicator<P> {
    type Error = P::Error;

    fn configure_output(&mut self) -> Result<(), Self::Error> {
        self.pin.set_state(self.initial)
    }

    fn set_output(&mut self, on: bool) -> Result<(), Self::Error> {
        self.pin.set_state(PinState::from(on))
    }
}
