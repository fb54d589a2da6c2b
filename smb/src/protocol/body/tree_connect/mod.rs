pub mod access_mask;

pub use access_mask::SMBAccessMask;

use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

const REQUEST_STRUCTURE_SIZE: u16 = 9;
const RESPONSE_STRUCTURE_SIZE: u16 = 16;
const REQUEST_HEADER_LEN: u16 = 64;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBTreeConnectFlags: u16 {
        const CLUSTER_RECONNECT = 0x0001;
        const REDIRECT_TO_OWNER = 0x0002;
        const EXTENSION_PRESENT = 0x0004;
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBShareType {
    Disk = 0x01,
    Pipe = 0x02,
    Print = 0x03,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBShareFlags: u32 {
        const AUTO_CACHING                = 0x0000_0010;
        const VDO_CACHING                 = 0x0000_0020;
        const NO_CACHING                  = 0x0000_0030;
        const DFS                         = 0x0000_0001;
        const DFS_ROOT                    = 0x0000_0002;
        const RESTRICT_EXCLUSIVE_OPENS    = 0x0000_0100;
        const FORCE_SHARED_DELETE         = 0x0000_0200;
        const ALLOW_NAMESPACE_CACHING     = 0x0000_0400;
        const ACCESS_BASED_DIRECTORY_ENUM = 0x0000_0800;
        const FORCE_LEVEL_II_OPLOCK       = 0x0000_1000;
        const ENCRYPT_DATA                = 0x0000_8000;
        const COMPRESS_DATA               = 0x0010_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBTreeConnectCapabilities: u32 {
        const DFS                     = 0x0000_0008;
        const CONTINUOUS_AVAILABILITY = 0x0000_0010;
        const SCALEOUT                = 0x0000_0020;
        const CLUSTER                 = 0x0000_0040;
        const ASYMMETRIC              = 0x0000_0080;
        const REDIRECT_TO_OWNER       = 0x0000_0100;
    }
}

/// Requests carry either a UNC path or an extension blob (RemotedIdentity
/// contexts etc.). This server only ever needs the path to resolve a
/// share, so the extension form is parsed only far enough to recover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBTreeConnectRequest {
    pub flags: SMBTreeConnectFlags,
    pub path: String,
}

impl SMBTreeConnectRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let flags = SMBTreeConnectFlags::from_bits_truncate(reader.u16());
        let buffer_offset = reader.u16();
        let buffer_length = reader.u16();

        if buffer_offset < REQUEST_HEADER_LEN {
            return Err(SMBError::wire_decode("tree connect buffer offset precedes message body"));
        }
        reader.seek(buffer_offset as usize - REQUEST_HEADER_LEN as usize);

        let path = if flags.contains(SMBTreeConnectFlags::EXTENSION_PRESENT) {
            reader.skip(8); // tree_connect_context_offset/count, reserved
            let num_chars = (buffer_length.saturating_sub(8)) as usize / 2;
            reader.utf16le(num_chars)
        } else {
            reader.utf16le(buffer_length as usize / 2)
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { flags, path })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBTreeConnectResponse {
    pub share_type: SMBShareType,
    pub share_flags: SMBShareFlags,
    pub capabilities: SMBTreeConnectCapabilities,
    pub maximal_access: SMBAccessMask,
}

impl SMBTreeConnectResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u8(self.share_type as u8);
        writer.u8(0); // reserved
        writer.u32(self.share_flags.bits());
        writer.u32(self.capabilities.bits());
        self.maximal_access.write(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_path_request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u16(0); // flags
        w.u16(REQUEST_HEADER_LEN + 8);
        let path = "\\\\server\\share";
        w.u16((path.encode_utf16().count() * 2) as u16);
        w.utf16le(path);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBTreeConnectRequest::parse(&mut r).unwrap();
        assert_eq!(req.path, path);
    }

    #[test]
    fn response_writes_structure_size() {
        let resp = SMBTreeConnectResponse {
            share_type: SMBShareType::Disk,
            share_flags: SMBShareFlags::empty(),
            capabilities: SMBTreeConnectCapabilities::empty(),
            maximal_access: SMBAccessMask::file_pipe_printer(access_mask::SMBFilePipePrinterAccessMask::GENERIC_ALL),
        };
        let mut w = Writer::new();
        resp.write(&mut w);
        assert_eq!(u16::from_le_bytes(w.as_slice()[0..2].try_into().unwrap()), RESPONSE_STRUCTURE_SIZE);
    }
}
