use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

const TIME_SINCE_1601_AND_EPOCH_SECS: u64 = 11_644_473_600;

/// Windows FILETIME: 100ns ticks since 1601-01-01, as two little-endian
/// `u32`s on the wire.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct FileTime {
    ticks: u64,
}

impl FileTime {
    pub fn zero() -> Self {
        Self { ticks: 0 }
    }

    pub fn from_unix_secs(unix_timestamp: u64) -> Self {
        let secs_since_1601 = unix_timestamp + TIME_SINCE_1601_AND_EPOCH_SECS;
        Self { ticks: secs_since_1601 * 10_000_000 }
    }

    pub fn now() -> Self {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Self::from_unix_secs(since_epoch.as_secs())
    }

    pub fn to_unix_secs(self) -> u64 {
        (self.ticks / 10_000_000).saturating_sub(TIME_SINCE_1601_AND_EPOCH_SECS)
    }

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let low = reader.u32();
        let high = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { ticks: ((high as u64) << 32) | low as u64 })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32((self.ticks & 0xFFFF_FFFF) as u32);
        writer.u32((self.ticks >> 32) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_unix_seconds() {
        let now = 1_700_000_000u64;
        let ft = FileTime::from_unix_secs(now);
        assert_eq!(ft.to_unix_secs(), now);
    }

    #[test]
    fn wire_round_trip() {
        let ft = FileTime::from_unix_secs(1_700_000_000);
        let mut w = Writer::new();
        ft.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 8);
        let mut r = Reader::new(&bytes);
        assert_eq!(FileTime::parse(&mut r).unwrap(), ft);
    }
}
