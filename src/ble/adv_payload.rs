//! Advertisement payload encoder.
//!
//! Builds the advertising data as a sequence of AD structures:
//! ```text
//! Byte 0:     length (counts type + value)
//! Byte 1:     AD type
//! Byte 2..:   value
//! ```
//! The beacon emits exactly two structures, in this order:
//! ```text
//! [len] 0x09 <device name bytes, no terminator>
//! [len] 0xFF <company id lo> <company id hi> <application payload...>
//! ```
//! Oversize payloads are rejected, never truncated.

use crate::error::Error;

/// Legacy advertising PDU payload limit (bytes).
pub const LEGACY_PAYLOAD_LEN: usize = 31;

/// Extended advertising payload limit supported by the SoftDevice (bytes).
pub const EXTENDED_PAYLOAD_LEN: usize = 254;

/// Length byte + type byte.
pub const AD_HEADER_LEN: usize = 2;

/// Size of the company identifier at the start of manufacturer data.
pub const COMPANY_ID_LEN: usize = 2;

/// AD type: Shortened Local Name.
pub const AD_TYPE_SHORT_LOCAL_NAME: u8 = 0x08;
/// AD type: Complete Local Name.
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
/// AD type: Manufacturer Specific Data.
pub const AD_TYPE_MANUFACTURER_SPECIFIC_DATA: u8 = 0xFF;

/// Bluetooth SIG company identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompanyId(pub u16);

impl CompanyId {
    /// 0xFFFF is reserved by the SIG for internal use and testing.
    pub const TEST: CompanyId = CompanyId(0xFFFF);

    /// Wire representation (little-endian, independent of host order).
    pub const fn to_le_bytes(self) -> [u8; COMPANY_ID_LEN] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; COMPANY_ID_LEN]) -> Self {
        CompanyId(u16::from_le_bytes(bytes))
    }
}

/// Total encoded length of the name and manufacturer-data structures.
pub const fn encoded_len(name_len: usize, payload_len: usize) -> usize {
    AD_HEADER_LEN + name_len + AD_HEADER_LEN + COMPANY_ID_LEN + payload_len
}

/// `const`-friendly AD structure writer with a fixed capacity `N`.
///
/// Writes that do not fit are dropped but still counted, so
/// [`try_build`](Self::try_build) can report how many bytes were needed.
/// A structure whose length byte would overflow poisons the builder.
pub struct AdvertisementBuilder<const N: usize> {
    buf: [u8; N],
    ptr: usize,
    /// Body length of the first structure that did not fit a length byte.
    too_long: Option<usize>,
}

/// Encoded advertising data, at most `N` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvertisementData<const N: usize> {
    buf: [u8; N],
    len: usize,
}

pub type LegacyAdvertisementBuilder = AdvertisementBuilder<LEGACY_PAYLOAD_LEN>;
pub type ExtendedAdvertisementBuilder = AdvertisementBuilder<EXTENDED_PAYLOAD_LEN>;

pub type LegacyAdvertisementData = AdvertisementData<LEGACY_PAYLOAD_LEN>;
pub type ExtendedAdvertisementData = AdvertisementData<EXTENDED_PAYLOAD_LEN>;

impl<const N: usize> AdvertisementData<N> {
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<const N: usize> AsRef<[u8]> for AdvertisementData<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<const N: usize> core::ops::Deref for AdvertisementData<N> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl<const N: usize> Default for AdvertisementBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AdvertisementBuilder<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            ptr: 0,
            too_long: None,
        }
    }

    pub const fn capacity() -> usize {
        N
    }

    /// Bytes written (or attempted) so far.
    pub const fn len(&self) -> usize {
        self.ptr
    }

    pub const fn is_empty(&self) -> bool {
        self.ptr == 0
    }

    const fn write(mut self, data: &[u8]) -> Self {
        if self.ptr + data.len() <= N {
            let mut i = 0;
            while i < data.len() {
                self.buf[self.ptr] = data[i];
                i += 1;
                self.ptr += 1;
            }
        } else {
            self.ptr += data.len();
        }
        self
    }

    /// Append one AD structure. The length byte is computed here.
    pub const fn raw(self, ad_type: u8, value: &[u8]) -> Self {
        self.raw_with_prefix(ad_type, &[], value)
    }

    // `prefix ++ value` as a single structure, without a scratch buffer.
    const fn raw_with_prefix(self, ad_type: u8, prefix: &[u8], value: &[u8]) -> Self {
        let body = 1 + prefix.len() + value.len();
        if body > u8::MAX as usize {
            let mut res = self;
            if res.too_long.is_none() {
                res.too_long = Some(body);
            }
            res.ptr += 1 + body;
            return res;
        }
        self.write(&[body as u8, ad_type]).write(prefix).write(value)
    }

    /// Complete Local Name, raw UTF-8 bytes.
    pub const fn complete_local_name(self, name: &str) -> Self {
        self.raw(AD_TYPE_COMPLETE_LOCAL_NAME, name.as_bytes())
    }

    /// Manufacturer Specific Data: `company id (LE) ++ payload`.
    pub const fn manufacturer_data(self, company: CompanyId, payload: &[u8]) -> Self {
        self.raw_with_prefix(
            AD_TYPE_MANUFACTURER_SPECIFIC_DATA,
            &company.to_le_bytes(),
            payload,
        )
    }

    /// Finish the payload.
    ///
    /// Returns `Error::AdStructureTooLong` if a structure body exceeded 255
    /// bytes, otherwise `Error::PayloadOverflow` if more than `N` bytes were
    /// written.
    pub const fn try_build(self) -> Result<AdvertisementData<N>, Error> {
        if let Some(len) = self.too_long {
            return Err(Error::AdStructureTooLong { len });
        }
        if self.ptr <= N {
            Ok(AdvertisementData {
                buf: self.buf,
                len: self.ptr,
            })
        } else {
            Err(Error::PayloadOverflow {
                needed: self.ptr,
                limit: N,
            })
        }
    }

    /// Finish the payload, panicking on overflow.
    ///
    /// In a `const` context the panic turns into a build error.
    pub const fn build(self) -> AdvertisementData<N> {
        core::assert!(
            self.too_long.is_none(),
            "AD structure does not fit its length byte"
        );
        core::assert!(self.ptr <= N, "advertisement exceeds the PDU payload");

        AdvertisementData {
            buf: self.buf,
            len: self.ptr,
        }
    }
}

/// Encode the beacon advertisement: name first, then manufacturer data.
pub const fn encode<const N: usize>(
    name: &str,
    company: CompanyId,
    payload: &[u8],
) -> Result<AdvertisementData<N>, Error> {
    AdvertisementBuilder::<N>::new()
        .complete_local_name(name)
        .manufacturer_data(company, payload)
        .try_build()
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
