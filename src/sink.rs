//! Output sinks for frame levels.
//!
//! A sink receives one level per tick: `true` while the IR LED should mark and
//! `false` during spaces. Any `FnMut(bool)` closure is a sink, and
//! [`PinSink`] drives an `embedded-hal` [`OutputPin`] directly.
//!
//! Carrier modulation (38 kHz) is not done here; the pin is expected to gate a
//! carrier generated in hardware, or drive a module that modulates on its own.

use core::convert::Infallible;
use core::fmt::Debug;

use embedded_hal::digital::OutputPin;

/// Receives the output level for each tick of a transmission.
pub trait LevelSink {
    /// Error returned when the level cannot be applied.
    type Error: Debug;

    /// Applies `level` to the output. Called once per tick, in frame order.
    fn emit(&mut self, level: bool) -> Result<(), Self::Error>;
}

impl<F> LevelSink for F
where
    F: FnMut(bool),
{
    type Error = Infallible;

    fn emit(&mut self, level: bool) -> Result<(), Infallible> {
        self(level);
        Ok(())
    }
}

/// Drives an [`OutputPin`] with frame levels.
///
/// Marks set the pin `HIGH` unless the sink is inverted, which suits
/// active-low LED drivers.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use nec_tx::sink::{LevelSink, PinSink};
///
/// # let pin = Pin::new(&[PinTransaction::set(PinState::High)]);
/// let mut sink = PinSink::new(pin, None);
/// sink.emit(true).unwrap();
/// # sink.into_inner().done();
/// ```
#[derive(Debug)]
pub struct PinSink<P>
where
    P: OutputPin,
{
    pin: P,
    inverted: bool,
}

impl<P> PinSink<P>
where
    P: OutputPin,
{
    /// Wraps `pin`.
    ///
    /// # Arguments
    /// - `pin`: The output driving the IR LED (or the gate of its carrier).
    /// - `inverted`: Whether marks drive the pin `LOW`. Defaults to `false`.
    pub fn new(pin: P, inverted: Option<bool>) -> Self {
        Self {
            pin,
            inverted: inverted.unwrap_or(false),
        }
    }

    /// Whether marks drive the pin `LOW`.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Releases the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> LevelSink for PinSink<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn emit(&mut self, level: bool) -> Result<(), P::Error> {
        if level != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
