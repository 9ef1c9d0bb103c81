//! `BeaconStack` on the Nordic SoftDevice S140.
//!
//! The SoftDevice owns the radio schedule: once `start_advertising` has
//! spawned the advertising task, every advertising event is timed by the
//! SoftDevice and the application does nothing further.

use core::mem;

use embassy_executor::Spawner;
use heapless::Vec;
use nrf_softdevice::ble::peripheral::{self, AdvertiseError, NonconnectableAdvertisement};
use nrf_softdevice::ble::TxPower;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;

use crate::ble::adv_params::{supported_tx_power, AdvInterval, AdvertisementType};
use crate::ble::adv_payload::EXTENDED_PAYLOAD_LEN;
use crate::ble::controller::BeaconStack;
use crate::error::{BleError, Error};
use crate::fault;

/// Advertising data must outlive the advertising task.
static ADV_DATA: StaticCell<Vec<u8, EXTENDED_PAYLOAD_LEN>> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn advertise_task(
    sd: &'static Softdevice,
    adv: NonconnectableAdvertisement<'static>,
    config: peripheral::Config,
) {
    loop {
        match peripheral::advertise(sd, adv, &config).await {
            // Only reachable with a finite timeout; keep the beacon on air.
            Ok(()) | Err(AdvertiseError::Timeout) => {
                warn!("Advertising set terminated, restarting");
            }
            Err(AdvertiseError::Raw(e)) => fault::halt(BleError::Raw(e as u32).into()),
            Err(_) => fault::halt(BleError::Advertise.into()),
        }
    }
}

fn tx_power_from_dbm(dbm: i8) -> TxPower {
    match supported_tx_power(dbm) {
        8 => TxPower::Plus8dBm,
        7 => TxPower::Plus7dBm,
        6 => TxPower::Plus6dBm,
        5 => TxPower::Plus5dBm,
        4 => TxPower::Plus4dBm,
        3 => TxPower::Plus3dBm,
        2 => TxPower::Plus2dBm,
        0 => TxPower::ZerodBm,
        -4 => TxPower::Minus4dBm,
        -8 => TxPower::Minus8dBm,
        -12 => TxPower::Minus12dBm,
        -16 => TxPower::Minus16dBm,
        -20 => TxPower::Minus20dBm,
        _ => TxPower::Minus40dBm,
    }
}

/// SoftDevice-backed beacon stack.
pub struct SoftdeviceStack {
    spawner: Spawner,
    sd: Option<&'static Softdevice>,
    advertiser_ready: bool,
    adv_config: peripheral::Config,
    scan_response: bool,
    kind: AdvertisementType,
    adv_data: Option<&'static [u8]>,
}

impl SoftdeviceStack {
    pub fn new(spawner: Spawner) -> Self {
        Self {
            spawner,
            sd: None,
            advertiser_ready: false,
            adv_config: peripheral::Config::default(),
            scan_response: false,
            kind: AdvertisementType::NonConnectableUndirected,
            adv_data: None,
        }
    }

    fn softdevice(&self) -> Result<&'static Softdevice, Error> {
        self.sd.ok_or(Error::Ble(BleError::NotInitialized))
    }

    fn advertiser(&self) -> Result<&'static Softdevice, Error> {
        let sd = self.softdevice()?;
        if !self.advertiser_ready {
            return Err(BleError::NotInitialized.into());
        }
        Ok(sd)
    }
}

impl BeaconStack for SoftdeviceStack {
    fn init(&mut self, device_name: &'static str) -> Result<(), Error> {
        if self.sd.is_some() {
            return Err(BleError::AlreadyInitialized.into());
        }

        let max = raw::BLE_GAP_DEVNAME_MAX_LEN as usize;
        if device_name.len() > max {
            return Err(BleError::NameTooLong {
                len: device_name.len(),
                max,
            }
            .into());
        }

        let config = nrf_softdevice::Config {
            clock: Some(raw::nrf_clock_lf_cfg_t {
                source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
                rc_ctiv: 0,
                rc_temp_ctiv: 0,
                accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
            }),
            // Broadcaster only: one advertising set, no connection roles.
            gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
                adv_set_count: 1,
                periph_role_count: 0,
                central_role_count: 0,
                central_sec_count: 0,
                _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
            }),
            // Read-only GAP device name, kept by the SoftDevice.
            gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
                p_value: device_name.as_ptr() as _,
                current_len: device_name.len() as u16,
                max_len: device_name.len() as u16,
                write_perm: unsafe { mem::zeroed() },
                _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                    raw::BLE_GATTS_VLOC_STACK as u8,
                ),
            }),
            ..Default::default()
        };

        self.sd = Some(Softdevice::enable(&config));
        Ok(())
    }

    fn set_tx_power(&mut self, dbm: i8) -> Result<i8, Error> {
        self.softdevice()?;
        let power = tx_power_from_dbm(dbm);
        self.adv_config.tx_power = power;
        Ok(power as i8)
    }

    fn create_advertiser(&mut self) -> Result<(), Error> {
        let sd = self.softdevice()?;
        self.spawner
            .spawn(softdevice_task(sd))
            .map_err(|_| Error::Ble(BleError::TaskSpawn))?;
        self.advertiser_ready = true;
        Ok(())
    }

    fn set_scan_response(&mut self, enabled: bool) {
        self.scan_response = enabled;
    }

    fn set_interval(&mut self, min: AdvInterval, max: AdvInterval) -> Result<(), Error> {
        self.advertiser()?;
        // One interval per advertising set; the SoftDevice adds advDelay itself.
        if min != max {
            debug!(
                "SoftDevice takes a single interval, using {} of {}..{}",
                min.units(),
                min.units(),
                max.units()
            );
        }
        self.adv_config.interval = u32::from(min.units());
        Ok(())
    }

    fn set_advertisement_type(&mut self, kind: AdvertisementType) -> Result<(), Error> {
        self.advertiser()?;
        self.kind = kind;
        Ok(())
    }

    fn set_advertisement_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.advertiser()?;
        let buf = Vec::from_slice(data).map_err(|_| Error::PayloadOverflow {
            needed: data.len(),
            limit: EXTENDED_PAYLOAD_LEN,
        })?;
        let stored: &'static Vec<u8, EXTENDED_PAYLOAD_LEN> = ADV_DATA
            .try_init(buf)
            .ok_or(Error::Ble(BleError::DataAlreadySet))?;
        self.adv_data = Some(stored.as_slice());
        Ok(())
    }

    fn start_advertising(&mut self) -> Result<(), Error> {
        let sd = self.advertiser()?;
        let adv_data = self.adv_data.ok_or(Error::Ble(BleError::NoAdvertisementData))?;

        let adv = match self.kind {
            // Active scanners receive the same data in the scan response.
            AdvertisementType::ScannableUndirected if self.scan_response => {
                NonconnectableAdvertisement::ScannableUndirected {
                    adv_data,
                    scan_data: adv_data,
                }
            }
            AdvertisementType::ScannableUndirected | AdvertisementType::NonConnectableUndirected => {
                NonconnectableAdvertisement::NonscannableUndirected { adv_data }
            }
            AdvertisementType::ExtendedNonConnectableUndirected => {
                NonconnectableAdvertisement::ExtendedNonscannableUndirected {
                    set_id: 0,
                    anonymous: false,
                    adv_data,
                }
            }
        };

        self.spawner
            .spawn(advertise_task(sd, adv, self.adv_config))
            .map_err(|_| Error::Ble(BleError::TaskSpawn))?;
        Ok(())
    }
}
