//! Advertising controller - the one-shot beacon bring-up sequence.
//!
//! The sequence runs once at boot, in a fixed order, against any BLE stack
//! implementing [`BeaconStack`]. The first failing step aborts the
//! sequence; there is no retry and no fallback advertising mode. After
//! `start_advertising` returns, the stack transmits on its own schedule.

use crate::ble::adv_params::{AdvInterval, AdvertisementType, AdvertisingParams};
use crate::ble::adv_parser;
use crate::error::Error;

/// Capabilities the beacon needs from a BLE stack.
///
/// Calls arrive in the order documented on [`start_beacon`].
pub trait BeaconStack {
    /// Bring up the stack with its GAP identity.
    fn init(&mut self, device_name: &'static str) -> Result<(), Error>;

    /// Set the advertising TX power. Returns the level actually applied (dBm).
    fn set_tx_power(&mut self, dbm: i8) -> Result<i8, Error>;

    /// Create the context every advertising call depends on.
    fn create_advertiser(&mut self) -> Result<(), Error>;

    fn set_scan_response(&mut self, enabled: bool);

    fn set_interval(&mut self, min: AdvInterval, max: AdvInterval) -> Result<(), Error>;

    fn set_advertisement_type(&mut self, kind: AdvertisementType) -> Result<(), Error>;

    /// Install the encoded advertising data.
    fn set_advertisement_data(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Start continuous advertising; returns once the stack has taken over.
    fn start_advertising(&mut self) -> Result<(), Error>;
}

/// Setup steps, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupStep {
    Validate,
    Init,
    TxPower,
    CreateAdvertiser,
    Parameters,
    AdvertisementData,
    Start,
}

/// A fully described beacon.
#[derive(Clone, Copy, Debug)]
pub struct Beacon<'a> {
    /// Stack-level identity. Must match the advertised Complete Local Name.
    pub device_name: &'static str,
    /// Encoded advertising data.
    pub adv_data: &'a [u8],
    pub params: AdvertisingParams,
}

impl Beacon<'_> {
    /// Checks that need no stack: parameters, payload size and name consistency.
    pub fn validate(&self) -> Result<(), Error> {
        self.params.validate()?;

        let limit = self.params.mode.max_payload_len();
        if self.adv_data.len() > limit {
            return Err(Error::PayloadOverflow {
                needed: self.adv_data.len(),
                limit,
            });
        }

        match adv_parser::complete_local_name(self.adv_data) {
            Some(name) if name == self.device_name => Ok(()),
            _ => Err(Error::NameMismatch),
        }
    }
}

/// Run the beacon bring-up sequence:
///
/// 1. validate the beacon description
/// 2. `init` with the device name
/// 3. `set_tx_power`
/// 4. `create_advertiser`
/// 5. scan response, interval bounds, advertisement type
/// 6. `set_advertisement_data`
/// 7. `start_advertising`
pub fn start_beacon<S: BeaconStack>(stack: &mut S, beacon: &Beacon<'_>) -> Result<(), Error> {
    let mut step = SetupStep::Validate;
    let res = run_steps(stack, beacon, &mut step);
    if let Err(e) = res {
        error!("Beacon setup failed at {:?}: {:?}", step, e);
    }
    res
}

fn run_steps<S: BeaconStack>(
    stack: &mut S,
    beacon: &Beacon<'_>,
    step: &mut SetupStep,
) -> Result<(), Error> {
    let params = &beacon.params;

    *step = SetupStep::Validate;
    beacon.validate()?;
    debug!(
        "Advertisement: {} bytes, limit {}",
        beacon.adv_data.len(),
        params.mode.max_payload_len()
    );

    *step = SetupStep::Init;
    stack.init(beacon.device_name)?;
    info!("BLE stack up as \"{}\"", beacon.device_name);

    *step = SetupStep::TxPower;
    let applied = stack.set_tx_power(params.tx_power_dbm)?;
    if applied != params.tx_power_dbm {
        warn!(
            "TX power {} dBm requested, {} dBm applied",
            params.tx_power_dbm, applied
        );
    }

    *step = SetupStep::CreateAdvertiser;
    stack.create_advertiser()?;

    *step = SetupStep::Parameters;
    stack.set_scan_response(params.scan_response);
    stack.set_interval(params.interval_min, params.interval_max)?;
    stack.set_advertisement_type(params.advertisement_type())?;
    debug!(
        "Advertising every {}..{} units, scan response {}",
        params.interval_min.units(),
        params.interval_max.units(),
        params.scan_response
    );

    *step = SetupStep::AdvertisementData;
    stack.set_advertisement_data(beacon.adv_data)?;

    *step = SetupStep::Start;
    stack.start_advertising()?;
    info!("Advertising started");

    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::ble::adv_params::AdvertisingMode;
    use crate::ble::adv_payload::{encode, CompanyId, LegacyAdvertisementData};
    use crate::error::BleError;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Init(&'static str),
        TxPower(i8),
        CreateAdvertiser,
        ScanResponse(bool),
        Interval(u16, u16),
        Type(AdvertisementType),
        Data(Vec<u8>),
        Start,
    }

    #[derive(Default)]
    struct MockStack {
        calls: Vec<Call>,
        fail_init: bool,
        fail_start: bool,
    }

    impl BeaconStack for MockStack {
        fn init(&mut self, device_name: &'static str) -> Result<(), Error> {
            self.calls.push(Call::Init(device_name));
            if self.fail_init {
                return Err(BleError::Raw(0x0D).into());
            }
            Ok(())
        }

        fn set_tx_power(&mut self, dbm: i8) -> Result<i8, Error> {
            self.calls.push(Call::TxPower(dbm));
            Ok(dbm.min(8))
        }

        fn create_advertiser(&mut self) -> Result<(), Error> {
            self.calls.push(Call::CreateAdvertiser);
            Ok(())
        }

        fn set_scan_response(&mut self, enabled: bool) {
            self.calls.push(Call::ScanResponse(enabled));
        }

        fn set_interval(&mut self, min: AdvInterval, max: AdvInterval) -> Result<(), Error> {
            self.calls.push(Call::Interval(min.units(), max.units()));
            Ok(())
        }

        fn set_advertisement_type(&mut self, kind: AdvertisementType) -> Result<(), Error> {
            self.calls.push(Call::Type(kind));
            Ok(())
        }

        fn set_advertisement_data(&mut self, data: &[u8]) -> Result<(), Error> {
            self.calls.push(Call::Data(data.to_vec()));
            Ok(())
        }

        fn start_advertising(&mut self) -> Result<(), Error> {
            self.calls.push(Call::Start);
            if self.fail_start {
                return Err(BleError::Advertise.into());
            }
            Ok(())
        }
    }

    fn params() -> AdvertisingParams {
        AdvertisingParams {
            interval_min: AdvInterval::from_units(160),
            interval_max: AdvInterval::from_units(160),
            scan_response: true,
            tx_power_dbm: 15,
            mode: AdvertisingMode::Legacy,
        }
    }

    fn adv() -> LegacyAdvertisementData {
        encode("InNav Tag", CompanyId::TEST, &[3, 0, 0, 0]).unwrap()
    }

    #[test]
    fn runs_steps_in_order() {
        let adv = adv();
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &adv,
            params: params(),
        };
        let mut stack = MockStack::default();
        assert_eq!(start_beacon(&mut stack, &beacon), Ok(()));
        assert_eq!(
            stack.calls,
            [
                Call::Init("InNav Tag"),
                Call::TxPower(15),
                Call::CreateAdvertiser,
                Call::ScanResponse(true),
                Call::Interval(160, 160),
                Call::Type(AdvertisementType::ScannableUndirected),
                Call::Data(adv.to_vec()),
                Call::Start,
            ]
        );
    }

    #[test]
    fn init_failure_stops_sequence() {
        let adv = adv();
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &adv,
            params: params(),
        };
        let mut stack = MockStack {
            fail_init: true,
            ..Default::default()
        };
        assert_eq!(
            start_beacon(&mut stack, &beacon),
            Err(Error::Ble(BleError::Raw(0x0D)))
        );
        assert_eq!(stack.calls, [Call::Init("InNav Tag")]);
    }

    #[test]
    fn start_failure_is_reported() {
        let adv = adv();
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &adv,
            params: params(),
        };
        let mut stack = MockStack {
            fail_start: true,
            ..Default::default()
        };
        assert_eq!(
            start_beacon(&mut stack, &beacon),
            Err(Error::Ble(BleError::Advertise))
        );
        assert_eq!(stack.calls.last(), Some(&Call::Start));
    }

    #[test]
    fn invalid_interval_never_touches_the_stack() {
        let adv = adv();
        let mut p = params();
        p.interval_min = AdvInterval::from_units(320);
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &adv,
            params: p,
        };
        let mut stack = MockStack::default();
        assert_eq!(
            start_beacon(&mut stack, &beacon),
            Err(Error::IntervalOrder { min: 320, max: 160 })
        );
        assert!(stack.calls.is_empty());
    }

    #[test]
    fn extended_scan_response_never_touches_the_stack() {
        let adv = adv();
        let mut p = params();
        p.mode = AdvertisingMode::Extended;
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &adv,
            params: p,
        };
        let mut stack = MockStack::default();
        assert_eq!(
            start_beacon(&mut stack, &beacon),
            Err(Error::ExtendedScanResponse)
        );
        assert!(stack.calls.is_empty());
    }

    #[test]
    fn name_must_match_stack_identity() {
        let adv = adv();
        let beacon = Beacon {
            device_name: "Other Tag",
            adv_data: &adv,
            params: params(),
        };
        let mut stack = MockStack::default();
        assert_eq!(start_beacon(&mut stack, &beacon), Err(Error::NameMismatch));
        assert!(stack.calls.is_empty());
    }

    #[test]
    fn oversize_data_is_rejected_for_legacy_mode() {
        let data = [0u8; 32];
        let beacon = Beacon {
            device_name: "InNav Tag",
            adv_data: &data,
            params: params(),
        };
        assert_eq!(
            beacon.validate(),
            Err(Error::PayloadOverflow {
                needed: 32,
                limit: 31
            })
        );
    }
}
