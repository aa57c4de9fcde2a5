//! NEC frame encoding.
//!
//! A [`Signal`] is one complete NEC frame sampled at the protocol tick
//! (562.5 µs): exactly [`MAX_LENGTH`] levels, where `true` is a mark (output
//! active, carrier on) and `false` is a space.
//!
//! ## Frame construction
//!
//! Every frame starts with the leader: 16 mark ticks (9 ms) followed by 8 space
//! ticks (4.5 ms), or 4 space ticks (2.25 ms) for the repeat code. Each payload
//! bit is then pulse-distance encoded:
//!
//! ```text
//! logical 0:  1 0        (1.125 ms)
//! logical 1:  1 0 0 0    (2.25 ms)
//! ```
//!
//! A single terminating mark closes the frame, and the remainder is padded
//! with spaces until the 108 ms frame period has elapsed.
//!
//! ## Encoders
//!
//! - [`encode_standard`]: `address`, `!address`, `command`, `!command`
//! - [`encode_extended`]: 16-bit `address` (low byte first), `command`, `!command`
//! - [`encode_raw`]: a packed 32-bit frame, most significant bit first
//! - [`repeat_signal`]: the repeat code, also available as [`REPEAT_SIGNAL`]
//!
//! Payload bytes go on the air least significant bit first. [`pack_standard`]
//! and [`pack_extended`] produce the equivalent packed value for
//! [`encode_raw`], i.e. with each byte bit-reversed so that the first bit on
//! the air is bit 31.
//!
//! All encoders are `const fn`, so frames for a fixed remote can be built at
//! compile time.
//!
//! ## Example
//!
//! ```rust
//! use nec_tx::signal::{encode_raw, encode_standard};
//!
//! let on = encode_standard(0x00, 0x41);
//! assert_eq!(on, encode_raw(0x00FF_827D));
//! assert!(on.render().starts_with("1111111111111111000000001010"));
//! ```

use core::fmt::{self, Write};
use core::ops::Index;
use core::slice::Iter;

use heapless::String;

use crate::consts::{
    FRAME_BITS, LEADER_MARK_TICKS, LEADER_SPACE_TICKS, MAX_LENGTH, ONE_SPACE_TICKS,
    REPEAT_SPACE_TICKS, TICK_NS, ZERO_SPACE_TICKS,
};

/// The repeat code, sent while a button is held after the first full frame.
///
/// Built at compile time; shared by every transmission and never mutated.
pub static REPEAT_SIGNAL: Signal = repeat_signal();

/// One NEC frame as a sequence of per-tick output levels.
///
/// A `Signal` always holds exactly [`MAX_LENGTH`] levels. It is immutable once
/// built and cheap to copy, so the same frame can be handed to any number of
/// transmissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal {
    levels: [bool; MAX_LENGTH],
}

impl Signal {
    /// The levels of this frame, one per tick.
    pub const fn levels(&self) -> &[bool] {
        &self.levels
    }

    /// Number of levels; always [`MAX_LENGTH`].
    pub const fn len(&self) -> usize {
        MAX_LENGTH
    }

    /// Always `false`, a frame is never empty.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over the levels in transmission order.
    pub fn iter(&self) -> Iter<'_, bool> {
        self.levels.iter()
    }

    /// Number of ticks up to and including the terminating mark.
    ///
    /// Everything after this point is padding.
    pub fn occupied(&self) -> usize {
        self.levels.iter().rposition(|&level| level).map_or(0, |i| i + 1)
    }

    /// Time on the air before the padding starts, in microseconds.
    pub fn duration_us(&self) -> u32 {
        (self.occupied() as u32 * TICK_NS) / 1_000
    }

    /// Renders the frame as a string of `1` (mark) and `0` (space) characters.
    pub fn render(&self) -> String<MAX_LENGTH> {
        let mut out = String::new();
        for &level in &self.levels {
            // Capacity equals the number of levels.
            let _ = out.push(if level { '1' } else { '0' });
        }
        out
    }
}

impl Default for Signal {
    /// A frame of silence.
    fn default() -> Self {
        Self {
            levels: [false; MAX_LENGTH],
        }
    }
}

impl Index<usize> for Signal {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.levels[index]
    }
}

impl<'a> IntoIterator for &'a Signal {
    type Item = &'a bool;
    type IntoIter = Iter<'a, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &level in &self.levels {
            f.write_char(if level { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Fixed-capacity frame buffer used while encoding.
///
/// Unwritten slots are already spaces, so padding is implicit. Writes past
/// [`MAX_LENGTH`] are dropped.
struct Builder {
    buf: [bool; MAX_LENGTH],
    len: usize,
}

impl Builder {
    const fn leader(space_ticks: usize) -> Self {
        let builder = Self {
            buf: [false; MAX_LENGTH],
            len: 0,
        };
        builder
            .run(true, LEADER_MARK_TICKS)
            .run(false, space_ticks)
    }

    const fn push(mut self, level: bool) -> Self {
        if self.len < MAX_LENGTH {
            self.buf[self.len] = level;
            self.len += 1;
        }
        self
    }

    const fn run(mut self, level: bool, ticks: usize) -> Self {
        let mut i = 0;
        while i < ticks {
            self = self.push(level);
            i += 1;
        }
        self
    }

    const fn bit(self, one: bool) -> Self {
        let spaces = if one { ONE_SPACE_TICKS } else { ZERO_SPACE_TICKS };
        self.push(true).run(false, spaces)
    }

    // lsb first
    const fn byte(mut self, byte: u8) -> Self {
        let mut i = 0;
        while i < 8 {
            self = self.bit((byte >> i) & 1 == 1);
            i += 1;
        }
        self
    }

    // msb first
    const fn word(mut self, word: u32) -> Self {
        let mut i = 0;
        while i < FRAME_BITS {
            self = self.bit((word << i) & (1 << 31) != 0);
            i += 1;
        }
        self
    }

    const fn enclose(self) -> Signal {
        let builder = self.push(true);
        Signal {
            levels: builder.buf,
        }
    }
}

/// Encodes a classic NEC frame: `address`, `!address`, `command`, `!command`.
pub const fn encode_standard(address: u8, command: u8) -> Signal {
    Builder::leader(LEADER_SPACE_TICKS)
        .byte(address)
        .byte(!address)
        .byte(command)
        .byte(!command)
        .enclose()
}

/// Encodes an extended NEC frame with a 16-bit address.
///
/// The address replaces the address/inverse pair: low byte first, then high
/// byte, followed by `command` and `!command`.
pub const fn encode_extended(address: u16, command: u8) -> Signal {
    let [low, high] = address.to_le_bytes();
    Builder::leader(LEADER_SPACE_TICKS)
        .byte(low)
        .byte(high)
        .byte(command)
        .byte(!command)
        .enclose()
}

/// Encodes a packed 32-bit frame, most significant bit first.
///
/// Bit 31 is the first bit on the air. See [`pack_standard`] and
/// [`pack_extended`] for producing values equivalent to the byte encoders.
pub const fn encode_raw(frame: u32) -> Signal {
    Builder::leader(LEADER_SPACE_TICKS).word(frame).enclose()
}

/// Builds the repeat code: leader mark, 2.25 ms space and a terminating mark.
pub const fn repeat_signal() -> Signal {
    Builder::leader(REPEAT_SPACE_TICKS).enclose()
}

/// Packs a classic frame into the value [`encode_raw`] expects.
///
/// `encode_raw(pack_standard(a, c)) == encode_standard(a, c)`.
pub const fn pack_standard(address: u8, command: u8) -> u32 {
    pack([address, !address, command, !command])
}

/// Packs an extended frame into the value [`encode_raw`] expects.
///
/// `encode_raw(pack_extended(a, c)) == encode_extended(a, c)`.
pub const fn pack_extended(address: u16, command: u8) -> u32 {
    let [low, high] = address.to_le_bytes();
    pack([low, high, command, !command])
}

const fn pack(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes([
        bytes[0].reverse_bits(),
        bytes[1].reverse_bits(),
        bytes[2].reverse_bits(),
        bytes[3].reverse_bits(),
    ])
}
