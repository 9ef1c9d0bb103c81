//! Fatal setup error handling.
//!
//! The status LED blinks a fixed pattern, then the MCU resets (or halts, see
//! [`crate::config::RESET_ON_FAULT`]).

use core::cell::RefCell;

use embassy_nrf::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{block_for, Duration};

use crate::config::{FAULT_BLINK_COUNT, FAULT_BLINK_MS, RESET_ON_FAULT};
use crate::error::Error;

static STATUS_LED: Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>> =
    Mutex::new(RefCell::new(None));

/// Hand the status LED (active low) to the fault handler.
pub fn register_status_led(led: Output<'static>) {
    STATUS_LED.lock(|cell| cell.replace(Some(led)));
}

/// Signal a fatal error and never return.
pub fn halt(err: Error) -> ! {
    defmt::error!("Fatal: {:?}", err);

    let led = STATUS_LED.lock(|cell| cell.borrow_mut().take());
    if let Some(mut led) = led {
        let period = Duration::from_millis(FAULT_BLINK_MS);
        for _ in 0..FAULT_BLINK_COUNT {
            led.set_low();
            block_for(period);
            led.set_high();
            block_for(period);
        }
        led.set_low();
        // Keep the pin driven while halted.
        core::mem::forget(led);
    }

    if RESET_ON_FAULT {
        defmt::info!("Resetting");
        cortex_m::peripheral::SCB::sys_reset();
    }

    loop {
        cortex_m::asm::wfi();
    }
}
