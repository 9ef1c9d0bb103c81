//! innav-tag firmware entry point.
//!
//! Brings up the SoftDevice, installs the advertisement and hands the radio
//! over to the SoftDevice scheduler. There is no application loop: once
//! `start_beacon` returns, `main` returns and the executor idles while the
//! tag keeps broadcasting.

#![no_std]
#![no_main]

#[macro_use]
mod fmt;

mod ble;
mod config;
mod error;
mod fault;

use defmt_rtt as _; // global logger
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;

use crate::ble::adv_parser;
use crate::ble::controller::start_beacon;
use crate::ble::softdevice::SoftdeviceStack;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("innav-tag starting");

    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    // Status LED (P0.13 = LED1 on the nRF52840-DK), off until a fault.
    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);
    fault::register_status_led(led);

    let beacon = config::configured_beacon();

    let mut stack = SoftdeviceStack::new(spawner);
    if let Err(e) = start_beacon(&mut stack, &beacon) {
        fault::halt(e);
    }

    defmt::info!(
        "Beacon \"{}\" on air every {} us",
        config::DEVICE_NAME,
        config::ADV_INTERVAL_MIN.as_micros()
    );
    if let Some((company, payload)) = adv_parser::manufacturer_data(beacon.adv_data) {
        defmt::info!(
            "Manufacturer data: company {=u16:#x}, payload {=[u8]:x}",
            company.0,
            payload
        );
    }
}
