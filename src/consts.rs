//! Constants of the NEC infrared protocol.
//!
//! Every interval in an NEC transmission is an integer multiple of a single
//! time quantum, the [`TICK_NS`] (562.5 µs). A frame is rendered as a sequence
//! of [`MAX_LENGTH`] levels, one per tick, so the whole frame period is
//! `192 * 562.5 µs = 108 ms`.
//!
//! ## Frame layout
//!
//! | Section        | Ticks        | Duration |
//! |----------------|--------------|----------|
//! | Leader mark    | 16           | 9 ms     |
//! | Leader space   | 8            | 4.5 ms   |
//! | Logical `0`    | 1 + 1        | 1.125 ms |
//! | Logical `1`    | 1 + 3        | 2.25 ms  |
//! | Terminator     | 1            | 562.5 µs |
//! | Padding        | remainder    | silence  |
//!
//! The repeat code uses a 4-tick (2.25 ms) leader space and carries no payload.
//!
//! These values are protocol constants. Changing any of them breaks
//! compatibility with NEC receivers.

use core::time::Duration;

/// Length of one tick in nanoseconds (9/16 ms).
pub const TICK_NS: u32 = 562_500;

/// Length of one tick in microseconds, for timer calculations.
pub const TICK_US: f32 = 562.5;

/// One tick as a [`Duration`].
pub const TICK: Duration = Duration::from_nanos(TICK_NS as u64);

/// Number of levels in every encoded frame (`192 * TICK = 108 ms`).
pub const MAX_LENGTH: usize = 192;

/// Ticks of the 9 ms leader mark.
pub const LEADER_MARK_TICKS: usize = 16;

/// Ticks of the 4.5 ms leader space of a full frame.
pub const LEADER_SPACE_TICKS: usize = 8;

/// Ticks of the 2.25 ms leader space of a repeat code.
pub const REPEAT_SPACE_TICKS: usize = 4;

/// Space ticks following the mark of a logical `0`.
pub const ZERO_SPACE_TICKS: usize = 1;

/// Space ticks following the mark of a logical `1`.
pub const ONE_SPACE_TICKS: usize = 3;

/// Number of payload bits in a frame (address, inverse/extension, command, inverse).
pub const FRAME_BITS: u32 = 32;

/// Carrier frequency NEC receivers expect while the output is marking.
///
/// Carrier modulation is left to the caller or the LED driver hardware.
pub const CARRIER_HZ: u32 = 38_000;
