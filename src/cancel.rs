//! Cancellation of in-flight transmissions.
//!
//! A transmission blocks for at least one frame period (108 ms), and much
//! longer when repeat codes follow. A [`CancelToken`] lets another context
//! (an interrupt handler, another thread) stop it early. The token is checked
//! once per tick, before waiting for the tick.

use core::sync::atomic::{AtomicBool, Ordering};

/// Shared flag requesting that a transmission stop.
///
/// Usable from a `static`:
///
/// ```rust
/// use nec_tx::cancel::CancelToken;
///
/// static STOP: CancelToken = CancelToken::new();
///
/// STOP.cancel();
/// assert!(STOP.is_cancelled());
/// STOP.reset();
/// ```
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Requests cancellation. Takes effect at the next tick.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Clears a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
