use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct NegotiateSecurityMode: u16 {
        const NEGOTIATE_SIGNING_ENABLED  = 0x01;
        const NEGOTIATE_SIGNING_REQUIRED = 0x02;
    }
}

impl NegotiateSecurityMode {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let raw = reader.u16();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self::from_bits_truncate(raw))
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u16(self.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_match_spec() {
        assert_eq!(NegotiateSecurityMode::NEGOTIATE_SIGNING_ENABLED.bits(), 0x01);
        assert_eq!(NegotiateSecurityMode::NEGOTIATE_SIGNING_REQUIRED.bits(), 0x02);
    }

    #[test]
    fn round_trips_on_the_wire() {
        let mode = NegotiateSecurityMode::NEGOTIATE_SIGNING_ENABLED | NegotiateSecurityMode::NEGOTIATE_SIGNING_REQUIRED;
        let mut w = Writer::new();
        mode.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(NegotiateSecurityMode::parse(&mut r).unwrap(), mode);
    }
}
