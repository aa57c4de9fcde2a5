//! Interrupt-driven NEC transmitter.
//!
//! This module provides the [`NecDriver`] struct, a non-blocking counterpart
//! to [`Transmitter`](crate::transmitter::Transmitter). Instead of sleeping
//! between levels it advances by one level each time [`tick()`](NecDriver::tick)
//! is called, which makes it suitable for a hardware timer interrupt firing
//! every 562.5 µs.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use nec_tx::driver::{NecDriver, NecMode};
//! use nec_tx::signal::{REPEAT_SIGNAL, encode_standard};
//!
//! # let mut transactions = vec![PinTransaction::set(PinState::Low)];
//! # transactions.extend(encode_standard(0, 1).iter().chain(REPEAT_SIGNAL.iter()).map(|&l| {
//! #     PinTransaction::set(if l { PinState::High } else { PinState::Low })
//! # }));
//! # transactions.push(PinTransaction::set(PinState::Low));
//! # let tx_pin = Pin::new(&transactions);
//! let mut driver = NecDriver::new(tx_pin, None);
//! assert!(driver.send_repeat(&encode_standard(0, 1), 1));
//!
//! while driver.mode == NecMode::Tx {
//!     driver.tick(); // Called every 562.5 µs by a timer interrupt
//! }
//! # driver.tx.done();
//! ```
//!
//! ## Design Notes
//!
//! The first level of a frame is driven on the first `tick()` after queuing,
//! and the output returns to a space one tick after the last level, so every
//! level is held for a full tick.
//!
//! For the global, interrupt-shared setup, see [`crate::timer`].

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::consts::MAX_LENGTH;
use crate::signal::{REPEAT_SIGNAL, Signal};
use crate::transmitter::Playback;

/// Operational mode of a [`NecDriver`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum NecMode {
    ///   Nothing queued. The output is held at a space.
    #[default]
    Idle,
    ///   A playback is in progress; each `tick()` drives the next level.
    Tx,
}

/// A tick-driven NEC transmitter owning its output pin.
///
/// ## Type Parameters
///
/// - `TX`: A type implementing [`embedded_hal::digital::OutputPin`] driving the IR LED
///
/// ## Notes
///
/// - Only one `NecDriver` instance should be active if you're using interrupts.
/// - You are responsible for calling `tick()` at the NEC tick interval using a
///   hardware timer interrupt (see [`crate::timer::compute_ocr_value`]).
/// - Pin errors can't be reported from an interrupt and are ignored.
#[derive(Debug)]
pub struct NecDriver<TX>
where
    TX: OutputPin,
{
    /// The current mode of the driver
    pub mode: NecMode,
    /// TX pin
    pub tx: TX,
    inverted: bool,
    signal: Signal,
    frames_left: usize,
    repeats_left: usize,
    index: usize,

    /// Counter of completed frames, including repeat codes.
    /// Incremented each time a full [`MAX_LENGTH`] levels have been driven.
    pub frames_sent: u32,
}

impl<TX> NecDriver<TX>
where
    TX: OutputPin,
{
    /// Creates a new `NecDriver` driving `tx`.
    ///
    /// # Arguments
    /// - `tx`: The output pin driving the IR LED.
    /// - `inverted`: Whether marks drive the pin `LOW` (active-low drivers).
    ///
    /// # Notes
    /// The pin is driven to a space initially.
    pub fn new(tx: TX, inverted: Option<bool>) -> Self {
        let mut driver = Self {
            mode: NecMode::Idle,
            tx,
            inverted: inverted.unwrap_or(false),
            signal: Signal::default(),
            frames_left: 0,
            repeats_left: 0,
            index: 0,
            frames_sent: 0,
        };
        driver.write_tx(false);
        driver
    }

    fn write_tx(&mut self, level: bool) {
        if level != self.inverted {
            let _ = self.tx.set_high();
        } else {
            let _ = self.tx.set_low();
        }
    }

    /// Sets the driver into idle mode, releasing the output.
    pub fn set_mode_idle(&mut self) {
        if self.mode != NecMode::Idle {
            self.write_tx(false);
            self.frames_left = 0;
            self.repeats_left = 0;
            self.index = 0;
            self.mode = NecMode::Idle;
            debug!("nec: driver idle after {} frame(s)", self.frames_sent);
        }
    }

    fn set_mode_tx(&mut self) {
        if self.mode != NecMode::Tx {
            self.index = 0;
            self.mode = NecMode::Tx;
            debug!(
                "nec: driver queued {} frame(s) and {} repeat code(s)",
                self.frames_left,
                self.repeats_left
            );
        }
    }

    /// Queues `signal` for playback.
    ///
    /// # Returns
    /// - `true` if the playback was queued (or was empty)
    /// - `false` if a playback is already in progress
    pub fn send(&mut self, signal: &Signal, playback: Playback) -> bool {
        if self.mode == NecMode::Tx {
            return false;
        }
        let (frames, repeats) = playback.counts();
        if frames == 0 {
            return true;
        }
        self.signal = *signal;
        self.frames_left = frames;
        self.repeats_left = repeats;
        self.set_mode_tx();
        true
    }

    /// Queues `signal` once. See [`send`](NecDriver::send).
    pub fn send_once(&mut self, signal: &Signal) -> bool {
        self.send(signal, Playback::Once)
    }

    /// Queues `signal` `n` times back to back. See [`send`](NecDriver::send).
    pub fn send_times(&mut self, signal: &Signal, n: usize) -> bool {
        self.send(signal, Playback::Times(n))
    }

    /// Queues `signal` followed by `n` repeat codes. See [`send`](NecDriver::send).
    pub fn send_repeat(&mut self, signal: &Signal, n: usize) -> bool {
        self.send(signal, Playback::Repeat(n))
    }

    /// Polls for the end of the current playback.
    ///
    /// Use with `nb::block!` from a context other than the ticking interrupt.
    pub fn wait_idle(&self) -> nb::Result<(), Infallible> {
        if self.mode == NecMode::Tx {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    fn current(&self) -> &Signal {
        if self.frames_left > 0 {
            &self.signal
        } else {
            &REPEAT_SIGNAL
        }
    }

    /// Advances playback by one tick.
    ///
    /// This function must be called at fixed intervals of 562.5 µs.
    /// Does nothing while idle.
    pub fn tick(&mut self) {
        if self.mode != NecMode::Tx {
            return;
        }
        // Finished a frame? (after holding its last level for one tick)
        if self.index >= MAX_LENGTH {
            self.index = 0;
            self.frames_sent = self.frames_sent.wrapping_add(1);
            if self.frames_left > 0 {
                self.frames_left -= 1;
            } else {
                self.repeats_left = self.repeats_left.saturating_sub(1);
            }
            if self.frames_left == 0 && self.repeats_left == 0 {
                self.set_mode_idle();
                return;
            }
        }
        let level = self.current()[self.index];
        self.index += 1;
        self.write_tx(level);
    }
}
