use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SMBFileId {
    pub persistent: u64,
    pub volatile: u64,
}

impl SMBFileId {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let persistent = reader.u64();
        let volatile = reader.u64();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { persistent, volatile })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u64(self.persistent);
        writer.u64(self.volatile);
    }

    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.persistent.to_le_bytes());
        out[8..].copy_from_slice(&self.volatile.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let persistent = u64::from_le_bytes(bytes[..8].try_into().unwrap());
        let volatile = u64::from_le_bytes(bytes[8..].try_into().unwrap());
        Self { persistent, volatile }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let id = SMBFileId { persistent: 7, volatile: 42 };
        let mut w = Writer::new();
        id.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(SMBFileId::parse(&mut r).unwrap(), id);
    }
}
