//! Tick sources and timer utilities.
//!
//! Playback is paced by a [`TickSource`], a periodic clock that fires once per
//! NEC tick (562.5 µs). Three ways of producing ticks are provided:
//!
//! - `StdTicker` (feature `std`): a deadline-based ticker over
//!   `std::time::Instant`
//! - `DelayTicker` (feature `delay-loop`): a blocking loop over
//!   `embedded_hal::delay::DelayNs`
//! - a hardware timer interrupt calling [`NecDriver::tick`](crate::driver::NecDriver::tick)
//!   (feature `timer-isr`), with `global_nec_timer_tick` and `tick_nec_timer!()`
//!   wrapping a globally shared driver
//!
//! For the interrupt route, [`compute_ocr_value`] and [`const_ocr_value`]
//! give the compare value for a timer in CTC mode.
//!
//! Common prescalers at 16 MHz: (For use with `compute_ocr_value` and `const_ocr_value`)
//!
//! | PRESCALER | TIMER_COUNTS | Interval   |
//! |-----------|--------------|------------|
//! |         8 |         1125 | 562.5 µs   |
//! |        64 |          141 | 564 µs     |
//! |       256 |           35 | 560 µs     |

use core::fmt::Debug;

use libm::round;

use crate::consts::{TICK_NS, TICK_US};

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "std")]
mod std_ticker;
#[cfg_attr(feature = "std", allow(unused_imports))]
#[cfg(feature = "std")]
pub use std_ticker::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use macros::*;

/// A periodic clock producing one tick per [`TICK_NS`].
///
/// A transmission calls [`start`](TickSource::start) once, then
/// [`wait`](TickSource::wait) before every level, and always calls
/// [`stop`](TickSource::stop) when it ends, whether it completed, failed or
/// was cancelled.
///
/// Ticks are consumed, never queued: the next tick is due one period after
/// `wait` last returned. If the caller is late for a tick, `wait` returns
/// immediately and the schedule restarts from there, so a slow sink stretches
/// the frame instead of bursting levels to catch up.
pub trait TickSource {
    /// Error raised when the clock can no longer produce ticks.
    type Error: Debug;

    /// Arms the clock. The first tick is one period after this call.
    fn start(&mut self);

    /// Waits for the next tick.
    ///
    /// An implementation may either return `Err(nb::Error::WouldBlock)` until
    /// the tick has elapsed, for the caller to poll with `nb::block!`, or block
    /// inside `wait` and return `Ok(())` once the tick is due. `StdTicker` and
    /// `DelayTicker` both block.
    fn wait(&mut self) -> nb::Result<(), Self::Error>;

    /// Disarms the clock.
    fn stop(&mut self);
}

/// Computes the compare value for an AVR timer (CTC mode) firing once per NEC tick.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
///
/// # Returns
/// - Timer counts per tick (rounds to nearest integer)
pub fn compute_ocr_value(f_cpu: u32, prescaler: u32) -> u16 {
    let ticks_per_second: f32 = f_cpu as f32 / prescaler as f32;
    let counts_per_tick: f32 = ticks_per_second * (TICK_US / 1_000_000.0);
    round(counts_per_tick as f64) as u16
}

/// Compile-time compare value calculator
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
///
/// # Returns
/// - Timer counts per tick (rounds to nearest integer)
pub const fn const_ocr_value(f_cpu: u32, prescaler: u32) -> u16 {
    let counts = (f_cpu / prescaler) as u64 * TICK_NS as u64;
    ((counts + 500_000_000) / 1_000_000_000) as u16
}
