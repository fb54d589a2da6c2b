use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

#[repr(u16)]
#[derive(Debug, Eq, PartialEq, TryFromPrimitive, Serialize, Deserialize, Copy, Clone, Ord, PartialOrd, Default, Hash)]
#[allow(non_camel_case_types)]
pub enum SMBDialect {
    V2_0_2 = 0x0202,
    V2_1_0 = 0x0210,
    V3_0_0 = 0x0300,
    V3_0_2 = 0x0302,
    V3_1_1 = 0x0311,
    #[default]
    Wildcard = 0x02FF,
}

impl SMBDialect {
    pub fn is_smb3(&self) -> bool {
        (*self as u16) >= 0x0300
    }

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let raw = reader.u16();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Self::try_from(raw).map_err(|_| SMBError::wire_decode(format!("unsupported dialect {:#06x}", raw)))
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u16(*self as u16);
    }

    /// Picks the highest mutually supported dialect within
    /// `[min_dialect, max_dialect]`, given the client's offered list
    /// (order-independent — this re-sorts).
    pub fn negotiate(offered: &[SMBDialect], min_dialect: SMBDialect, max_dialect: SMBDialect) -> Option<SMBDialect> {
        offered
            .iter()
            .copied()
            .filter(|d| *d != SMBDialect::Wildcard && *d >= min_dialect && *d <= max_dialect)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_values_match_spec() {
        assert_eq!(SMBDialect::V2_0_2 as u16, 0x0202);
        assert_eq!(SMBDialect::V2_1_0 as u16, 0x0210);
        assert_eq!(SMBDialect::V3_0_0 as u16, 0x0300);
        assert_eq!(SMBDialect::V3_0_2 as u16, 0x0302);
        assert_eq!(SMBDialect::V3_1_1 as u16, 0x0311);
    }

    #[test]
    fn is_smb3_classification() {
        assert!(!SMBDialect::V2_1_0.is_smb3());
        assert!(SMBDialect::V3_0_0.is_smb3());
    }

    #[test]
    fn negotiate_picks_highest_in_range() {
        let offered = [SMBDialect::V2_1_0, SMBDialect::V3_0_2, SMBDialect::V3_1_1];
        let picked = SMBDialect::negotiate(&offered, SMBDialect::V2_0_2, SMBDialect::V3_0_2);
        assert_eq!(picked, Some(SMBDialect::V3_0_2));
    }

    #[test]
    fn negotiate_returns_none_outside_range() {
        let offered = [SMBDialect::V2_0_2];
        assert_eq!(SMBDialect::negotiate(&offered, SMBDialect::V3_0_0, SMBDialect::V3_1_1), None);
    }

    #[test]
    fn dialect_round_trips_on_the_wire() {
        let mut w = Writer::new();
        SMBDialect::V3_1_1.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes, [0x11, 0x03]);
        let mut r = Reader::new(&bytes);
        assert_eq!(SMBDialect::parse(&mut r).unwrap(), SMBDialect::V3_1_1);
    }
}
