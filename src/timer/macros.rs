/// Declares a static global `NEC_DRIVER` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `NEC_DRIVER` suitable for use in
/// interrupt-based environments, where both the main thread and an ISR need
/// to safely access the shared driver state.
///
/// # Arguments
/// - `$tx`: The concrete type of the TX pin (must implement `OutputPin`)
///
/// # Example
/// ```rust,ignore
/// init_nec_driver!(MyTxPinType);
/// ```
#[macro_export]
macro_rules! init_nec_driver {
    ( $tx:ty ) => {
        pub static NEC_DRIVER: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::driver::NecDriver<$tx>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Initializes the global `NEC_DRIVER` singleton with a new driver instance.
///
/// This macro wraps construction of the `NecDriver` and stores it inside the
/// globally declared `NEC_DRIVER` created by `init_nec_driver!`.
///
/// # Arguments
/// - `$tx`: The TX pin (must implement `OutputPin`)
/// - `$inverted`: Optional; `Option<bool>` specifying whether marks drive the pin `LOW`
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_nec_driver!(tx);
///     setup_nec_driver!(tx, Some(true));
/// }
/// ```
///
/// # Notes
/// - Must be called inside a critical section-aware context (safe in `main()`).
/// - Requires `init_nec_driver!` to have been used earlier.
#[macro_export]
macro_rules! setup_nec_driver {
    ( $tx:expr ) => {
        $crate::setup_nec_driver!($tx, None)
    };
    ( $tx:expr, $inverted:expr ) => {
        $crate::critical_section::with(|cs| {
            let _ = NEC_DRIVER
                .borrow(cs)
                .replace(Some($crate::driver::NecDriver::new($tx, $inverted)));
        });
    };
}

/// Calls `tick()` on the global `NEC_DRIVER` if it has been initialized.
///
/// This macro is intended to be invoked from a timer ISR firing every
/// 562.5 µs to advance playback by one level.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_nec_timer!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `NEC_DRIVER` was declared with `init_nec_driver!`
///   and initialized via `setup_nec_driver!`.
/// - Safe to call repeatedly; does nothing if the driver hasn't been set up yet.
#[macro_export]
macro_rules! tick_nec_timer {
    () => {
        $crate::critical_section::with(|cs| {
            if let Some(driver) = NEC_DRIVER.borrow(cs).borrow_mut().as_mut() {
                driver.tick();
            }
        });
    };
}
