//! Host-testable library interface for innav-tag.
//!
//! This crate root re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required): advertisement encoding,
//! AD structure parsing, advertising parameters and the bring-up sequence.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;

pub use config::configured_beacon;
pub use error::{BleError, Error, IntervalBound};

// Internal module paths for the actual implementations
#[path = "ble/adv_payload.rs"]
mod ble_adv_payload_impl;
#[path = "ble/adv_parser.rs"]
mod ble_adv_parser_impl;
#[path = "ble/adv_params.rs"]
mod ble_adv_params_impl;
#[path = "ble/controller.rs"]
mod ble_controller_impl;

// ═══════════════════════════════════════════════════════════════════════════
// BLE Module Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub mod ble {
    pub mod adv_payload {
        pub use crate::ble_adv_payload_impl::*;
    }
    pub mod adv_parser {
        pub use crate::ble_adv_parser_impl::*;
    }
    pub mod adv_params {
        pub use crate::ble_adv_params_impl::*;
    }
    pub mod controller {
        pub use crate::ble_controller_impl::*;
    }

    pub use adv_params::{AdvInterval, AdvertisementType, AdvertisingMode, AdvertisingParams};
    pub use adv_payload::{AdvertisementData, CompanyId};
    pub use controller::{start_beacon, Beacon, BeaconStack};
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
