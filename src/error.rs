//! Unified error type for innav-tag.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the firmware.
///
/// Every variant is fatal: the beacon has no fallback advertising mode,
/// so the caller reports the error and resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The BLE stack rejected or failed a setup call.
    Ble(BleError),

    // Advertisement payload
    /// Encoded AD structures need more room than the advertising PDU has.
    PayloadOverflow {
        /// Bytes the advertisement would occupy.
        needed: usize,
        /// Bytes available for the selected advertising mode.
        limit: usize,
    },

    /// An AD structure body (type + value) exceeds what its length byte
    /// can express.
    AdStructureTooLong {
        /// Type byte plus value bytes.
        len: usize,
    },

    /// The advertised Complete Local Name differs from the stack identity.
    NameMismatch,

    // Advertising parameters
    /// Minimum advertising interval is larger than the maximum.
    IntervalOrder { min: u16, max: u16 },

    /// An advertising interval bound lies outside 0x0020..=0x4000.
    IntervalOutOfRange { bound: IntervalBound, units: u16 },

    /// An interval in milliseconds has no 16-bit unit representation.
    IntervalTooLong { millis: u16 },

    /// Scan response requested with extended advertising, whose
    /// non-connectable scannable sets carry no advertising data.
    ExtendedScanResponse,
}

/// Which end of the advertising interval range an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntervalBound {
    Min,
    Max,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Raw error code from the SoftDevice.
    Raw(u32),
    /// The stack was already enabled.
    AlreadyInitialized,
    /// A setup call arrived before the stack was enabled.
    NotInitialized,
    /// Device name does not fit the GAP device name attribute.
    NameTooLong { len: usize, max: usize },
    /// The executor had no room for a stack task.
    TaskSpawn,
    /// Advertisement data can only be installed once.
    DataAlreadySet,
    /// `start_advertising` was called without advertisement data.
    NoAdvertisementData,
    /// The advertising procedure could not be started.
    Advertise,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
