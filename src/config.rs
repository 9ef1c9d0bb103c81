//! Application-wide constants and compile-time configuration.
//!
//! The beacon identity, advertising timing and radio power live here so
//! they can be tuned in one place. The advertisement itself is encoded at
//! compile time; an oversize configuration fails the build.

use crate::ble::adv_params::{AdvInterval, AdvertisingMode, AdvertisingParams};
use crate::ble::adv_payload::{encoded_len, AdvertisementBuilder, AdvertisementData, CompanyId};
use crate::ble::controller::Beacon;

// Beacon identity

/// Device name: GAP device name and advertised Complete Local Name.
pub const DEVICE_NAME: &str = "InNav Tag";

/// Manufacturer company identifier. 0xFFFF is the SIG test value; replace
/// it with an assigned identifier for production tags.
pub const COMPANY_ID: CompanyId = CompanyId::TEST;

/// Application payload carried after the company identifier.
/// Opaque to the firmware; interpreted by the navigation app.
pub const APP_PAYLOAD: [u8; 4] = [0x03, 0x00, 0x00, 0x00];

// Advertising

/// Legacy advertising keeps the tag visible to every BLE 4.x scanner.
pub const ADV_MODE: AdvertisingMode = AdvertisingMode::Legacy;

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
/// Equal bounds give a fixed period.
pub const ADV_INTERVAL_MIN: AdvInterval = AdvInterval::from_units(160);
pub const ADV_INTERVAL_MAX: AdvInterval = AdvInterval::from_units(160);

/// Answer active scans (ADV_SCAN_IND instead of ADV_NONCONN_IND).
pub const ADV_SCAN_RESPONSE: bool = true;

/// Requested advertising TX power (dBm). Maximum range; the radio driver
/// clamps it to the strongest level the chip supports (+8 dBm on nRF52840).
pub const ADV_TX_POWER_DBM: i8 = 15;

pub const ADV_PARAMS: AdvertisingParams = AdvertisingParams {
    interval_min: ADV_INTERVAL_MIN,
    interval_max: ADV_INTERVAL_MAX,
    scan_response: ADV_SCAN_RESPONSE,
    tx_power_dbm: ADV_TX_POWER_DBM,
    mode: ADV_MODE,
};

/// Capacity of the compile-time advertisement buffer.
pub const ADV_CAPACITY: usize = ADV_MODE.max_payload_len();

/// Encoded advertising data: Complete Local Name + Manufacturer Data.
pub static ADVERTISEMENT: AdvertisementData<ADV_CAPACITY> = AdvertisementBuilder::new()
    .complete_local_name(DEVICE_NAME)
    .manufacturer_data(COMPANY_ID, &APP_PAYLOAD)
    .build();

const _: () = assert!(
    encoded_len(DEVICE_NAME.len(), APP_PAYLOAD.len()) <= ADV_MODE.max_payload_len(),
    "DEVICE_NAME and APP_PAYLOAD do not fit the advertising payload"
);

const _: () = assert!(
    ADV_PARAMS.validate().is_ok(),
    "ADV_INTERVAL_MIN/ADV_INTERVAL_MAX or ADV_SCAN_RESPONSE/ADV_MODE are invalid"
);

/// The beacon this firmware brings up.
pub fn configured_beacon() -> Beacon<'static> {
    Beacon {
        device_name: DEVICE_NAME,
        adv_data: ADVERTISEMENT.as_bytes(),
        params: ADV_PARAMS,
    }
}

// Fault indication
//
// Status LED → P0.13 (LED1 on the nRF52840-DK, active low).
// The pin is selected in `main.rs`; adjust for your custom PCB.

/// Number of LED blinks before the MCU resets after a fatal setup error.
pub const FAULT_BLINK_COUNT: u32 = 10;

/// LED on/off time during the fault pattern (ms).
pub const FAULT_BLINK_MS: u64 = 100;

/// Reset after signalling a fatal error. When false the MCU halts with the
/// LED lit, which keeps the RTT log readable on the bench.
pub const RESET_ON_FAULT: bool = true;
