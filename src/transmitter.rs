//! Blocking, tick-paced playback of NEC frames.
//!
//! A [`Transmitter`] owns a [`TickSource`] and walks the levels of a
//! [`Signal`], delivering each one to a [`LevelSink`] one tick after the
//! previous one. The calling context is blocked until the last level was
//! delivered.
//!
//! ## Playback modes
//!
//! - [`transmit_once`](Transmitter::transmit_once): the frame, once
//! - [`transmit_times`](Transmitter::transmit_times): the frame `n` times back to back
//! - [`transmit_repeat`](Transmitter::transmit_repeat): the frame once, then
//!   [`REPEAT_SIGNAL`] `n` times, which is how a remote signals a held button
//!
//! All repetitions run on one continuously ticking clock; it is not restarted
//! between frames.
//!
//! ## Phase
//!
//! The transmitter waits for a tick before emitting each level, including the
//! first one. The sink is therefore first called one tick after the
//! transmission starts, and every level is held for a full tick.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! use nec_tx::signal::encode_extended;
//! use nec_tx::timer::DelayTicker;
//! use nec_tx::transmitter::Transmitter;
//!
//! # let delay = NoopDelay::new();
//! let mut transmitter = Transmitter::new(DelayTicker::new(delay));
//! let mut levels = 0;
//! transmitter
//!     .transmit_repeat(&encode_extended(0xEF00, 3), &mut |_level: bool| levels += 1, 4)
//!     .unwrap();
//! assert_eq!(levels, 5 * 192);
//! ```

use nb::block;

use crate::cancel::CancelToken;
use crate::consts::MAX_LENGTH;
use crate::error::TransmitError;
use crate::signal::{REPEAT_SIGNAL, Signal};
use crate::sink::LevelSink;
use crate::timer::TickSource;

/// How often a frame is played.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Playback {
    /// The frame, once.
    Once,
    /// The frame, `n` times back to back.
    Times(usize),
    /// The frame once, followed by `n` repeat codes.
    Repeat(usize),
}

impl Playback {
    /// Number of full frames and repeat codes this playback sends.
    pub const fn counts(self) -> (usize, usize) {
        match self {
            Playback::Once => (1, 0),
            Playback::Times(n) => (n, 0),
            Playback::Repeat(n) => (1, n),
        }
    }

    /// Total number of ticks this playback occupies.
    pub const fn ticks(self) -> usize {
        let (frames, repeats) = self.counts();
        (frames + repeats) * MAX_LENGTH
    }
}

/// Paces frames against a [`TickSource`].
///
/// ## Type Parameters
///
/// - `T`: the tick source, e.g. `StdTicker` on a host or `DelayTicker` over a
///   HAL delay
#[derive(Debug)]
pub struct Transmitter<T>
where
    T: TickSource,
{
    ticker: T,
}

impl<T> Default for Transmitter<T>
where
    T: TickSource + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Transmitter<T>
where
    T: TickSource,
{
    /// Creates a transmitter pacing with `ticker`.
    pub fn new(ticker: T) -> Self {
        Self { ticker }
    }

    /// Releases the tick source.
    pub fn into_inner(self) -> T {
        self.ticker
    }

    /// Transmits `signal` once.
    pub fn transmit_once<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Once, sink, None)
    }

    /// Transmits `signal` `n` times back to back.
    pub fn transmit_times<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        n: usize,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Times(n), sink, None)
    }

    /// Transmits `signal` once, followed by `n` repeat codes.
    pub fn transmit_repeat<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        n: usize,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Repeat(n), sink, None)
    }

    /// Like [`transmit_once`](Transmitter::transmit_once), stopping at the
    /// next tick once `cancel` is set.
    pub fn transmit_once_with_cancel<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        cancel: &CancelToken,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Once, sink, Some(cancel))
    }

    /// Like [`transmit_times`](Transmitter::transmit_times), stopping at the
    /// next tick once `cancel` is set.
    pub fn transmit_times_with_cancel<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        n: usize,
        cancel: &CancelToken,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Times(n), sink, Some(cancel))
    }

    /// Like [`transmit_repeat`](Transmitter::transmit_repeat), stopping at the
    /// next tick once `cancel` is set.
    pub fn transmit_repeat_with_cancel<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        n: usize,
        cancel: &CancelToken,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        self.transmit(signal, Playback::Repeat(n), sink, Some(cancel))
    }

    /// Transmits `signal` according to `playback`.
    ///
    /// # Arguments
    /// - `signal`: The frame to send.
    /// - `playback`: How often to send it, see [`Playback`].
    /// - `sink`: Receives one level per tick.
    /// - `cancel`: Checked once per tick; once set the transmission stops.
    ///
    /// # Errors
    /// - [`TransmitError::Timer`] when the tick source fails
    /// - [`TransmitError::Sink`] when the sink rejects a level
    /// - [`TransmitError::Cancelled`] when `cancel` was set. The sink is
    ///   driven to a space before returning so the LED isn't left on. A sink
    ///   error on that release is logged and otherwise ignored.
    ///
    /// The tick source is stopped on every exit path, including a panicking sink.
    pub fn transmit<S>(
        &mut self,
        signal: &Signal,
        playback: Playback,
        sink: &mut S,
        cancel: Option<&CancelToken>,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        let (frames, repeats) = playback.counts();
        debug!("nec: sending {} frame(s) and {} repeat code(s)", frames, repeats);

        let mut clock = Running::start(&mut self.ticker);
        let result = clock.run(signal, frames, repeats, sink, cancel);
        drop(clock);

        if let Err(TransmitError::Cancelled) = result {
            debug!("nec: transmission cancelled");
            if sink.emit(false).is_err() {
                debug!("nec: output not released after cancel");
            }
        }
        result
    }
}

/// A started tick source, stopped again when dropped.
struct Running<'a, T>
where
    T: TickSource,
{
    ticker: &'a mut T,
}

impl<'a, T> Running<'a, T>
where
    T: TickSource,
{
    fn start(ticker: &'a mut T) -> Self {
        ticker.start();
        Self { ticker }
    }

    fn run<S>(
        &mut self,
        signal: &Signal,
        frames: usize,
        repeats: usize,
        sink: &mut S,
        cancel: Option<&CancelToken>,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        for _ in 0..frames {
            self.play(signal, sink, cancel)?;
        }
        for _ in 0..repeats {
            self.play(&REPEAT_SIGNAL, sink, cancel)?;
        }
        Ok(())
    }

    fn play<S>(
        &mut self,
        signal: &Signal,
        sink: &mut S,
        cancel: Option<&CancelToken>,
    ) -> Result<(), TransmitError<T::Error, S::Error>>
    where
        S: LevelSink,
    {
        trace!("nec: frame of {} ticks", signal.occupied());
        for &level in signal {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(TransmitError::Cancelled);
            }
            block!(self.ticker.wait()).map_err(TransmitError::Timer)?;
            sink.emit(level).map_err(TransmitError::Sink)?;
        }
        Ok(())
    }
}

impl<T> Drop for Running<'_, T>
where
    T: TickSource,
{
    fn drop(&mut self) {
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{encode_extended, encode_standard};
    use crate::sink::PinSink;
    use core::convert::Infallible;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    /// Records calls instead of sleeping.
    #[derive(Default)]
    struct FakeTicker {
        starts: u32,
        stops: u32,
        waits: usize,
        fail_after: Option<usize>,
        would_block: bool,
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Stalled;

    impl TickSource for FakeTicker {
        type Error = Stalled;

        fn start(&mut self) {
            self.starts += 1;
        }

        fn wait(&mut self) -> nb::Result<(), Stalled> {
            if self.would_block {
                self.would_block = false;
                return Err(nb::Error::WouldBlock);
            }
            self.would_block = true;
            if self.fail_after == Some(self.waits) {
                return Err(nb::Error::Other(Stalled));
            }
            self.waits += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn record<T: TickSource>(
        transmitter: &mut Transmitter<T>,
        signal: &Signal,
        playback: Playback,
    ) -> Vec<bool> {
        let mut levels = Vec::new();
        transmitter
            .transmit(signal, playback, &mut |level: bool| levels.push(level), None)
            .unwrap();
        levels
    }

    #[test]
    fn test_transmit_once_emits_every_level_in_order() {
        let signal = encode_standard(0, 1);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let levels = record(&mut transmitter, &signal, Playback::Once);
        assert_eq!(levels.len(), MAX_LENGTH);
        assert_eq!(levels, signal.levels());
        let ticker = transmitter.into_inner();
        assert_eq!(ticker.waits, MAX_LENGTH);
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[test]
    fn test_transmit_times_shares_one_clock() {
        let signal = encode_extended(61184, 3);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let mut levels = Vec::new();
        transmitter
            .transmit_times(&signal, &mut |level: bool| levels.push(level), 4)
            .unwrap();
        assert_eq!(levels.len(), 4 * MAX_LENGTH);
        for chunk in levels.chunks(MAX_LENGTH) {
            assert_eq!(chunk, signal.levels());
        }
        let ticker = transmitter.into_inner();
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[test]
    fn test_transmit_repeat_follows_with_repeat_codes() {
        let signal = encode_standard(0, 65);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let mut levels = Vec::new();
        transmitter
            .transmit_repeat(&signal, &mut |level: bool| levels.push(level), 3)
            .unwrap();
        assert_eq!(levels.len(), MAX_LENGTH + 3 * REPEAT_SIGNAL.len());
        assert_eq!(&levels[..MAX_LENGTH], signal.levels());
        for chunk in levels[MAX_LENGTH..].chunks(REPEAT_SIGNAL.len()) {
            assert_eq!(chunk, REPEAT_SIGNAL.levels());
        }
        assert_eq!(Playback::Repeat(3).ticks(), levels.len());
    }

    #[test]
    fn test_zero_repetitions() {
        let signal = encode_standard(1, 2);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        assert!(record(&mut transmitter, &signal, Playback::Times(0)).is_empty());
        assert_eq!(
            record(&mut transmitter, &signal, Playback::Repeat(0)),
            signal.levels()
        );
        let ticker = transmitter.into_inner();
        assert_eq!((ticker.starts, ticker.stops), (2, 2));
    }

    #[test]
    fn test_timer_failure_propagates_and_stops_clock() {
        let signal = encode_standard(0, 1);
        let mut transmitter = Transmitter::new(FakeTicker {
            fail_after: Some(10),
            ..Default::default()
        });
        let mut emitted = 0;
        let result = transmitter.transmit_once(&signal, &mut |_level: bool| emitted += 1);
        assert_eq!(result, Err(TransmitError::Timer(Stalled)));
        assert_eq!(emitted, 10);
        let ticker = transmitter.into_inner();
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[test]
    fn test_cancel_stops_at_next_tick() {
        let signal = encode_standard(0, 1);
        let token = CancelToken::new();
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let mut levels = Vec::new();
        let result = transmitter.transmit(
            &signal,
            Playback::Repeat(10),
            &mut |level: bool| {
                levels.push(level);
                if levels.len() == 20 {
                    token.cancel();
                }
            },
            Some(&token),
        );
        assert_eq!(result, Err(TransmitError::Cancelled));
        // 20 paced levels, then the output is released.
        assert_eq!(levels.len(), 21);
        assert_eq!(levels.last(), Some(&false));
        let ticker = transmitter.into_inner();
        assert_eq!(ticker.waits, 20);
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[test]
    fn test_with_cancel_variants() {
        let signal = encode_standard(0x20, 0x40);
        let token = CancelToken::new();
        let mut transmitter = Transmitter::new(FakeTicker::default());

        let mut levels = Vec::new();
        transmitter
            .transmit_times_with_cancel(
                &signal,
                &mut |level: bool| levels.push(level),
                2,
                &token,
            )
            .unwrap();
        assert_eq!(levels.len(), 2 * MAX_LENGTH);

        levels.clear();
        transmitter
            .transmit_repeat_with_cancel(
                &signal,
                &mut |level: bool| levels.push(level),
                1,
                &token,
            )
            .unwrap();
        assert_eq!(levels.len(), 2 * MAX_LENGTH);

        // Cancelled before the first tick: only the release is emitted.
        token.cancel();
        levels.clear();
        let result = transmitter.transmit_once_with_cancel(
            &signal,
            &mut |level: bool| levels.push(level),
            &token,
        );
        assert_eq!(result, Err(TransmitError::Cancelled));
        assert_eq!(levels, [false]);

        let ticker = transmitter.into_inner();
        assert_eq!(ticker.waits, 4 * MAX_LENGTH);
        assert_eq!((ticker.starts, ticker.stops), (3, 3));
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Unplugged;

    /// Cancels after `limit` levels and refuses every level after that.
    struct StuckSink<'a> {
        token: &'a CancelToken,
        accepted: usize,
        limit: usize,
        refused: usize,
    }

    impl LevelSink for StuckSink<'_> {
        type Error = Unplugged;

        fn emit(&mut self, _level: bool) -> Result<(), Unplugged> {
            if self.token.is_cancelled() {
                self.refused += 1;
                return Err(Unplugged);
            }
            self.accepted += 1;
            if self.accepted == self.limit {
                self.token.cancel();
            }
            Ok(())
        }
    }

    #[test]
    fn test_cancel_reported_when_release_fails() {
        let signal = encode_standard(0, 1);
        let token = CancelToken::new();
        let mut sink = StuckSink {
            token: &token,
            accepted: 0,
            limit: 5,
            refused: 0,
        };
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let result = transmitter.transmit_repeat_with_cancel(&signal, &mut sink, 3, &token);
        assert_eq!(result, Err(TransmitError::Cancelled));
        assert_eq!(sink.accepted, 5);
        assert_eq!(sink.refused, 1);
        let ticker = transmitter.into_inner();
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    struct FlakySink {
        accepted: usize,
        limit: usize,
    }

    impl LevelSink for FlakySink {
        type Error = Unplugged;

        fn emit(&mut self, _level: bool) -> Result<(), Unplugged> {
            if self.accepted == self.limit {
                return Err(Unplugged);
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_propagates() {
        let signal = encode_standard(0, 1);
        let mut sink = FlakySink {
            accepted: 0,
            limit: 2,
        };
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let result = transmitter.transmit_repeat(&signal, &mut sink, 2);
        assert_eq!(result, Err(TransmitError::Sink(Unplugged)));
        assert_eq!(sink.accepted, 2);
        let ticker = transmitter.into_inner();
        assert_eq!(ticker.waits, 3);
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[test]
    fn test_pin_sink_follows_frame() {
        let transactions = REPEAT_SIGNAL
            .iter()
            .map(|&level| {
                PinTransaction::set(if level {
                    PinState::High
                } else {
                    PinState::Low
                })
            })
            .collect::<Vec<_>>();
        let mut sink = PinSink::new(PinMock::new(&transactions), None);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        transmitter.transmit_once(&REPEAT_SIGNAL, &mut sink).unwrap();
        sink.into_inner().done();
    }

    #[test]
    fn test_ticker_stopped_when_sink_panics() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        fn exploding(_level: bool) {
            panic!("sink exploded");
        }

        let signal = encode_standard(0, 1);
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ = transmitter.transmit_once(&signal, &mut exploding);
        }));
        assert!(outcome.is_err());
        let ticker = transmitter.into_inner();
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_ticker_paces_full_frame() {
        use crate::consts::TICK;
        use crate::timer::StdTicker;
        use std::time::{Duration, Instant};

        let signal = encode_standard(0, 1);
        let mut transmitter: Transmitter<StdTicker> = Transmitter::default();
        let begin = Instant::now();
        let mut stamps = Vec::with_capacity(MAX_LENGTH);
        transmitter
            .transmit_once(&signal, &mut |_level: bool| stamps.push(Instant::now()))
            .unwrap();
        assert_eq!(stamps.len(), MAX_LENGTH);
        // The first level is emitted after a full tick.
        assert!(stamps[0] - begin >= TICK);
        // Every level is held for a full tick, give or take sink jitter.
        let jitter = Duration::from_micros(50);
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= TICK - jitter);
        }
        assert!(begin.elapsed() >= TICK * MAX_LENGTH as u32);
        // Generous slack for loaded CI machines.
        assert!(begin.elapsed() < TICK * MAX_LENGTH as u32 + Duration::from_secs(1));
        assert!(!transmitter.into_inner().is_running());
    }

    #[test]
    fn test_sink_type_is_infallible_for_closures() {
        let mut transmitter = Transmitter::new(FakeTicker::default());
        let result: Result<(), TransmitError<Stalled, Infallible>> =
            transmitter.transmit_once(&REPEAT_SIGNAL, &mut |_level: bool| {});
        assert!(result.is_ok());
    }
}
