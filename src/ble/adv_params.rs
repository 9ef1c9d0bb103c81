//! Advertising parameters: interval, advertisement type and TX power.
//!
//! Intervals are expressed in the protocol's 0.625 ms units. The beacon
//! only ever advertises non-connectable and undirected; connectable PDU
//! types are not representable here.

use crate::ble::adv_payload::{EXTENDED_PAYLOAD_LEN, LEGACY_PAYLOAD_LEN};
use crate::error::{Error, IntervalBound};

/// Duration of one advertising interval unit (µs).
pub const ADV_INTERVAL_UNIT_US: u32 = 625;

/// Smallest legal advertising interval (20 ms).
pub const ADV_INTERVAL_MIN_UNITS: u16 = 0x0020;

/// Largest legal advertising interval (10.24 s).
pub const ADV_INTERVAL_MAX_UNITS: u16 = 0x4000;

/// TX power levels the nRF52840 radio supports (dBm), ascending.
pub const SUPPORTED_TX_POWER_DBM: [i8; 14] = [-40, -20, -16, -12, -8, -4, 0, 2, 3, 4, 5, 6, 7, 8];

/// Advertising interval in 0.625 ms units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvInterval(u16);

impl AdvInterval {
    pub const fn from_units(units: u16) -> Self {
        AdvInterval(units)
    }

    /// Convert milliseconds, rounding down to whole units.
    ///
    /// Fails above 40959 ms, where the unit count leaves `u16`.
    pub const fn from_millis(ms: u16) -> Result<Self, Error> {
        let units = (ms as u32 * 8) / 5;
        if units > u16::MAX as u32 {
            return Err(Error::IntervalTooLong { millis: ms });
        }
        Ok(AdvInterval(units as u16))
    }

    pub const fn units(self) -> u16 {
        self.0
    }

    pub const fn as_micros(self) -> u32 {
        self.0 as u32 * ADV_INTERVAL_UNIT_US
    }

    pub const fn is_legal(self) -> bool {
        self.0 >= ADV_INTERVAL_MIN_UNITS && self.0 <= ADV_INTERVAL_MAX_UNITS
    }
}

/// Legacy (31-byte PDU) or extended (chained, up to 254 bytes) advertising.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvertisingMode {
    Legacy,
    Extended,
}

impl AdvertisingMode {
    pub const fn max_payload_len(self) -> usize {
        match self {
            AdvertisingMode::Legacy => LEGACY_PAYLOAD_LEN,
            AdvertisingMode::Extended => EXTENDED_PAYLOAD_LEN,
        }
    }
}

/// Non-connectable, undirected advertising PDU types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvertisementType {
    /// ADV_NONCONN_IND: broadcast only.
    NonConnectableUndirected,
    /// ADV_SCAN_IND: broadcast, answers scan requests, still non-connectable.
    ScannableUndirected,
    /// ADV_EXT_IND pointing at a non-connectable, non-scannable AUX_ADV_IND.
    ExtendedNonConnectableUndirected,
}

impl AdvertisementType {
    /// PDU type field of the advertising channel PDU header.
    pub const fn pdu_type(self) -> u8 {
        match self {
            AdvertisementType::NonConnectableUndirected => 0x02,
            AdvertisementType::ScannableUndirected => 0x06,
            AdvertisementType::ExtendedNonConnectableUndirected => 0x07,
        }
    }

    pub const fn is_connectable(self) -> bool {
        false
    }

    pub const fn is_scannable(self) -> bool {
        matches!(self, AdvertisementType::ScannableUndirected)
    }
}

/// Everything the advertiser needs besides the payload itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingParams {
    pub interval_min: AdvInterval,
    pub interval_max: AdvInterval,
    /// Answer active scans with the advertisement data.
    pub scan_response: bool,
    /// Requested radio output power (dBm).
    pub tx_power_dbm: i8,
    pub mode: AdvertisingMode,
}

impl AdvertisingParams {
    /// Check the interval bounds and the scan response / mode combination.
    pub const fn validate(&self) -> Result<(), Error> {
        if !self.interval_min.is_legal() {
            return Err(Error::IntervalOutOfRange {
                bound: IntervalBound::Min,
                units: self.interval_min.units(),
            });
        }
        if !self.interval_max.is_legal() {
            return Err(Error::IntervalOutOfRange {
                bound: IntervalBound::Max,
                units: self.interval_max.units(),
            });
        }
        if self.interval_min.units() > self.interval_max.units() {
            return Err(Error::IntervalOrder {
                min: self.interval_min.units(),
                max: self.interval_max.units(),
            });
        }
        if self.scan_response && matches!(self.mode, AdvertisingMode::Extended) {
            return Err(Error::ExtendedScanResponse);
        }
        Ok(())
    }

    /// PDU type for these parameters. Only meaningful once
    /// [`validate`](Self::validate) has passed.
    pub const fn advertisement_type(&self) -> AdvertisementType {
        match self.mode {
            AdvertisingMode::Extended => AdvertisementType::ExtendedNonConnectableUndirected,
            AdvertisingMode::Legacy if self.scan_response => AdvertisementType::ScannableUndirected,
            AdvertisingMode::Legacy => AdvertisementType::NonConnectableUndirected,
        }
    }

    /// A fixed period without interval jitter.
    pub const fn is_fixed_interval(&self) -> bool {
        self.interval_min.units() == self.interval_max.units()
    }
}

/// Highest supported TX power not above `requested_dbm`.
///
/// Requests below the weakest level get the weakest level.
pub fn supported_tx_power(requested_dbm: i8) -> i8 {
    SUPPORTED_TX_POWER_DBM
        .iter()
        .rev()
        .copied()
        .find(|&level| level <= requested_dbm)
        .unwrap_or(SUPPORTED_TX_POWER_DBM[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(min: u16, max: u16) -> AdvertisingParams {
        AdvertisingParams {
            interval_min: AdvInterval::from_units(min),
            interval_max: AdvInterval::from_units(max),
            scan_response: false,
            tx_power_dbm: 0,
            mode: AdvertisingMode::Legacy,
        }
    }

    #[test]
    fn hundred_ms_is_160_units() {
        let interval = AdvInterval::from_millis(100).unwrap();
        assert_eq!(interval.units(), 160);
        assert_eq!(interval.as_micros(), 100_000);
        assert_eq!(AdvInterval::from_millis(20).unwrap().units(), 32);
    }

    #[test]
    fn millis_beyond_unit_range_are_rejected_not_wrapped() {
        assert_eq!(AdvInterval::from_millis(40959).unwrap().units(), 65534);
        assert_eq!(
            AdvInterval::from_millis(40960),
            Err(Error::IntervalTooLong { millis: 40960 })
        );
        // 40980 ms would wrap to 32 units, a legal 20 ms interval.
        assert_eq!(
            AdvInterval::from_millis(40980),
            Err(Error::IntervalTooLong { millis: 40980 })
        );
        assert_eq!(
            AdvInterval::from_millis(u16::MAX),
            Err(Error::IntervalTooLong { millis: u16::MAX })
        );
    }

    #[test]
    fn longest_representable_millis_fail_validation() {
        let long = AdvInterval::from_millis(40959).unwrap();
        let p = AdvertisingParams {
            interval_min: AdvInterval::from_units(160),
            interval_max: long,
            ..params(160, 160)
        };
        assert_eq!(
            p.validate(),
            Err(Error::IntervalOutOfRange {
                bound: IntervalBound::Max,
                units: 65534
            })
        );
    }

    #[test]
    fn equal_bounds_are_accepted() {
        let p = params(160, 160);
        assert_eq!(p.validate(), Ok(()));
        assert!(p.is_fixed_interval());
        assert_eq!(p.interval_min, p.interval_max);
    }

    #[test]
    fn min_above_max_is_rejected() {
        assert_eq!(
            params(200, 160).validate(),
            Err(Error::IntervalOrder { min: 200, max: 160 })
        );
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        assert_eq!(
            params(0x001F, 160).validate(),
            Err(Error::IntervalOutOfRange {
                bound: IntervalBound::Min,
                units: 0x001F
            })
        );
        assert_eq!(
            params(160, 0x4001).validate(),
            Err(Error::IntervalOutOfRange {
                bound: IntervalBound::Max,
                units: 0x4001
            })
        );
        assert_eq!(params(0x0020, 0x4000).validate(), Ok(()));
    }

    #[test]
    fn advertisement_type_is_never_connectable() {
        let mut p = params(160, 160);
        assert_eq!(
            p.advertisement_type(),
            AdvertisementType::NonConnectableUndirected
        );
        assert_eq!(p.advertisement_type().pdu_type(), 0x02);

        p.scan_response = true;
        assert_eq!(p.advertisement_type(), AdvertisementType::ScannableUndirected);
        assert!(p.advertisement_type().is_scannable());

        p.scan_response = false;
        p.mode = AdvertisingMode::Extended;
        assert_eq!(p.validate(), Ok(()));
        assert_eq!(
            p.advertisement_type(),
            AdvertisementType::ExtendedNonConnectableUndirected
        );

        for kind in [
            AdvertisementType::NonConnectableUndirected,
            AdvertisementType::ScannableUndirected,
            AdvertisementType::ExtendedNonConnectableUndirected,
        ] {
            assert!(!kind.is_connectable());
        }
    }

    #[test]
    fn extended_mode_with_scan_response_is_rejected() {
        let mut p = params(160, 160);
        p.mode = AdvertisingMode::Extended;
        p.scan_response = true;
        assert_eq!(p.validate(), Err(Error::ExtendedScanResponse));

        // Interval problems are reported first.
        p.interval_min = AdvInterval::from_units(0x4001);
        assert!(matches!(
            p.validate(),
            Err(Error::IntervalOutOfRange { .. })
        ));
    }

    #[test]
    fn mode_payload_limits() {
        assert_eq!(AdvertisingMode::Legacy.max_payload_len(), 31);
        assert_eq!(AdvertisingMode::Extended.max_payload_len(), 254);
    }

    #[test]
    fn tx_power_rounds_down_to_supported_level() {
        assert_eq!(supported_tx_power(15), 8);
        assert_eq!(supported_tx_power(8), 8);
        assert_eq!(supported_tx_power(1), 0);
        assert_eq!(supported_tx_power(-5), -8);
        assert_eq!(supported_tx_power(-40), -40);
        assert_eq!(supported_tx_power(-100), -40);
    }
}
