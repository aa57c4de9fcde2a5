use core::convert::Infallible;
use std::thread;
use std::time::Instant;

use crate::consts::TICK;
use crate::timer::TickSource;

/// A tick source over the monotonic clock of the host.
///
/// [`wait`](TickSource::wait) sleeps the calling thread until the tick is due
/// and never returns `WouldBlock`. The next tick is scheduled one period after
/// the moment the thread actually woke up, so consecutive ticks are never
/// closer than [`TICK`]. Oversleeping stretches the schedule instead of being
/// made up by shorter periods later. A tick that is already overdue when
/// `wait` is called is consumed immediately.
#[derive(Debug, Default)]
pub struct StdTicker {
    next: Option<Instant>,
}

impl StdTicker {
    /// Creates a disarmed ticker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the ticker is armed.
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }
}

impl TickSource for StdTicker {
    type Error = Infallible;

    fn start(&mut self) {
        self.next = Some(Instant::now() + TICK);
    }

    fn wait(&mut self) -> nb::Result<(), Infallible> {
        let deadline = *self.next.get_or_insert_with(|| Instant::now() + TICK);
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next = Some(Instant::now().max(deadline) + TICK);
        Ok(())
    }

    fn stop(&mut self) {
        self.next = None;
    }
}
