//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Broadcaster** role:
//!
//! 1. **Payload Encoder** - builds the Complete Local Name and Manufacturer
//!    Specific Data AD structures into one advertising payload.
//! 2. **Advertising Parameters** - interval bounds, non-connectable
//!    advertisement type and TX power.
//! 3. **Controller** - runs the one-shot bring-up sequence against a
//!    [`controller::BeaconStack`].
//! 4. **SoftDevice binding** - the `BeaconStack` the firmware runs on.
//!
//! After bring-up the SoftDevice transmits on its own schedule; no
//! application task touches the advertisement again.

pub mod adv_params;
pub mod adv_parser;
pub mod adv_payload;
pub mod controller;
pub mod softdevice;
