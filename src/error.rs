//! Error types for frame transmission.

/// Reasons a paced transmission stops before the last level was delivered.
///
/// Encoding never fails; only playback does. A failed transmission is not
/// retried: a broken tick source invalidates all further pacing, and a sink
/// error means the output can no longer be driven.
///
/// # Type Parameters
/// - `T`: error of the [`TickSource`](crate::timer::TickSource)
/// - `S`: error of the [`LevelSink`](crate::sink::LevelSink)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransmitError<T, S> {
    /// The tick source failed to produce the next tick.
    #[error("tick source failed: {0:?}")]
    Timer(T),
    /// The output sink rejected a level.
    #[error("output sink failed: {0:?}")]
    Sink(S),
    /// The transmission was cancelled through its [`CancelToken`](crate::cancel::CancelToken).
    #[error("transmission cancelled")]
    Cancelled,
}
