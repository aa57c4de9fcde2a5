use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::consts::TICK_NS;
use crate::timer::TickSource;

/// A tick source that blocks on a delay provider for every tick.
///
/// This is a simple timing loop for use in environments where interrupts are
/// unavailable or undesired. It paces playback using a delay provider
/// implementing `embedded_hal::delay::DelayNs`.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// use nec_tx::signal::encode_standard;
/// use nec_tx::timer::DelayTicker;
/// use nec_tx::transmitter::Transmitter;
///
/// # let delay = NoopDelay::new();
/// let mut transmitter = Transmitter::new(DelayTicker::new(delay));
/// let mut marks = 0;
/// transmitter
///     .transmit_once(&encode_standard(0, 1), &mut |level: bool| marks += level as u32)
///     .unwrap();
/// assert_eq!(marks, 49);
/// ```
///
/// # Notes
/// - The delay runs after the previous level was emitted, so the time spent in
///   the sink adds to every tick. Keep sinks short.
/// - Delay providers can't fail in `embedded-hal` 1.0, so neither can this.
#[derive(Debug)]
pub struct DelayTicker<D>
where
    D: DelayNs,
{
    delay: D,
}

impl<D> DelayTicker<D>
where
    D: DelayNs,
{
    /// Wraps a delay provider, typically from the HAL.
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Releases the delay provider.
    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D> TickSource for DelayTicker<D>
where
    D: DelayNs,
{
    type Error = Infallible;

    fn start(&mut self) {}

    fn wait(&mut self) -> nb::Result<(), Infallible> {
        self.delay.delay_ns(TICK_NS);
        Ok(())
    }

    fn stop(&mut self) {}
}
