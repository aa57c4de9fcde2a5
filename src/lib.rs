//! # nec-tx
//!
//! A portable, no_std Rust transmitter for the NEC infrared remote-control protocol.
//!
//! This crate turns an address and a command into the exact tick-by-tick
//! waveform of an NEC frame, and plays it back against an output of your
//! choice:
//! - `embedded-hal` traits for digital output and blocking delays
//! - any `FnMut(bool)` closure as an output sink
//! - interrupt-safe global driver access with `critical-section`
//! - optional tick sources using either timer interrupts, a blocking delay, or `std::time`
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and enables `StdTicker` |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for tick timing |
//! | `timer-isr` (default) | Uses `critical_section::with` for a globally shared driver |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Classic, extended and raw** NEC frame encoding, usable in `const` context
//! - **Repeat codes** for held buttons, shared as [`signal::REPEAT_SIGNAL`]
//! - **Blocking playback** with [`transmitter::Transmitter`], cancellable per tick
//! - **Interrupt-driven playback** with [`driver::NecDriver`]
//!
//! ## Usage
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! use nec_tx::signal::encode_standard;
//! use nec_tx::timer::DelayTicker;
//! use nec_tx::transmitter::Transmitter;
//!
//! # let delay = NoopDelay::new();
//! let power = encode_standard(0x00, 0x41);
//! let mut transmitter = Transmitter::new(DelayTicker::new(delay));
//! transmitter
//!     .transmit_repeat(&power, &mut |level: bool| {
//!         // drive the IR LED (or the gate of a 38 kHz carrier) here
//!         let _ = level;
//!     }, 3)
//!     .unwrap();
//! ```
//!
//! Or, queue a frame on a [`driver::NecDriver`] and call `tick()` from a timer
//! interrupt every 562.5 µs.
//!
//! ## Integration Notes
//!
//! - Every level lasts one tick of 562.5 µs; a frame is 192 ticks (108 ms)
//! - Carrier modulation at 38 kHz is left to the hardware
//! - Only one driver instance should be active at a time in interrupt-driven mode
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod cancel;
pub mod consts;
pub mod driver;
pub mod error;
pub mod signal;
pub mod sink;
pub mod timer;
pub mod transmitter;
