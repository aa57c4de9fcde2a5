//! Logging shims.
//!
//! Forwards to `log` or `defmt` depending on the enabled feature. With neither
//! feature enabled the arguments are still evaluated by reference, so values
//! that only exist for diagnostics don't trip the `unused` lints.
//!
//! Format strings must stay compatible with both backends: plain `{}` holes
//! and primitive arguments only.

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::debug!($s $(, $x)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$x; )*
        }
    }};
}

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::trace!($s $(, $x)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$x; )*
        }
    }};
}
