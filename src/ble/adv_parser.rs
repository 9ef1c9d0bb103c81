use crate::ble::adv_payload::{
    CompanyId, AD_TYPE_COMPLETE_LOCAL_NAME, AD_TYPE_MANUFACTURER_SPECIFIC_DATA,
    AD_TYPE_SHORT_LOCAL_NAME, COMPANY_ID_LEN,
};

/// One AD structure borrowed from raw advertisement data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdStructure<'a> {
    pub ad_type: u8,
    pub value: &'a [u8],
}

/// Iterator over the AD structures in raw advertisement data.
///
/// Stops at a zero length byte (early padding) or at a structure that
/// runs past the end of the buffer.
#[derive(Clone)]
pub struct AdStructures<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = AdStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.data.get(self.pos)? as usize;
        if len == 0 || self.pos + len >= self.data.len() {
            self.pos = self.data.len();
            return None;
        }
        let ad_type = self.data[self.pos + 1];
        let value = &self.data[self.pos + 2..self.pos + 1 + len];
        self.pos += len + 1;
        Some(AdStructure { ad_type, value })
    }
}

/// Walk the AD structures in `data`.
pub fn ad_structures(data: &[u8]) -> AdStructures<'_> {
    AdStructures { data, pos: 0 }
}

/// Value of the first AD structure of `ad_type`.
pub fn find(data: &[u8], ad_type: u8) -> Option<&[u8]> {
    ad_structures(data)
        .find(|ad| ad.ad_type == ad_type)
        .map(|ad| ad.value)
}

/// Extract the Complete Local Name, if present and valid UTF-8.
pub fn complete_local_name(data: &[u8]) -> Option<&str> {
    find(data, AD_TYPE_COMPLETE_LOCAL_NAME).and_then(|v| core::str::from_utf8(v).ok())
}

/// Extract complete/shortened local name from advertisement data.
pub fn device_name(data: &[u8]) -> Option<&str> {
    ad_structures(data)
        .find(|ad| {
            ad.ad_type == AD_TYPE_COMPLETE_LOCAL_NAME || ad.ad_type == AD_TYPE_SHORT_LOCAL_NAME
        })
        .and_then(|ad| core::str::from_utf8(ad.value).ok())
}

/// Split Manufacturer Specific Data into company id and payload.
pub fn manufacturer_data(data: &[u8]) -> Option<(CompanyId, &[u8])> {
    let value = find(data, AD_TYPE_MANUFACTURER_SPECIFIC_DATA)?;
    if value.len() < COMPANY_ID_LEN {
        return None;
    }
    let company = CompanyId::from_le_bytes([value[0], value[1]]);
    Some((company, &value[COMPANY_ID_LEN..]))
}
