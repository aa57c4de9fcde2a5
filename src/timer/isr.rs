use crate::driver::NecDriver;
use crate::signal::Signal;
use crate::transmitter::Playback;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// Used to initialize the global static `NecDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use embedded_hal_mock::eh1::digital::Mock as Pin;
/// use nec_tx::driver::NecDriver;
/// use nec_tx::timer::global_nec_driver_init;
///
/// static NEC_DRIVER: Mutex<RefCell<Option<NecDriver<Pin>>>> = global_nec_driver_init::<Pin>();
/// ```
pub const fn global_nec_driver_init<TX: OutputPin>() -> Mutex<RefCell<Option<NecDriver<TX>>>> {
    Mutex::new(RefCell::new(None))
}

/// Installs a new `NecDriver` into the global slot.
///
/// # Arguments
/// * The global static `NecDriver`
/// * The tx pin
/// * Whether marks drive the pin `LOW`
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_nec_driver_setup(&NEC_DRIVER, tx, None);
/// }
/// ```
pub fn global_nec_driver_setup<TX: OutputPin>(
    global_driver: &'static Mutex<RefCell<Option<NecDriver<TX>>>>,
    tx: TX,
    inverted: Option<bool>,
) {
    critical_section::with(|cs| {
        let _ = global_driver
            .borrow(cs)
            .replace(Some(NecDriver::new(tx, inverted)));
    });
}

/// Queues a playback on the global driver.
///
/// # Returns
/// * `false` if the driver isn't set up or is still transmitting
pub fn global_nec_driver_send<TX: OutputPin>(
    global_driver: &'static Mutex<RefCell<Option<NecDriver<TX>>>>,
    signal: &Signal,
    playback: Playback,
) -> bool {
    critical_section::with(|cs| {
        global_driver
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .is_some_and(|driver| driver.send(signal, playback))
    })
}

/// Runs the tick at each interrupt
///
/// # Arguments
/// * The global static `NecDriver`
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     global_nec_timer_tick(&NEC_DRIVER);
/// }
/// ```
pub fn global_nec_timer_tick<TX: OutputPin>(
    global_driver: &'static Mutex<RefCell<Option<NecDriver<TX>>>>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.tick();
        }
    });
}
