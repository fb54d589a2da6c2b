pub mod action;
pub mod context;
pub mod disposition;
pub mod file_attributes;
pub mod file_id;
pub mod impersonation_level;
pub mod oplock;
pub mod options;
pub mod share_access;

pub use action::SMBCreateAction;
pub use context::CreateContext;
pub use disposition::SMBCreateDisposition;
pub use file_attributes::SMBFileAttributes;
pub use file_id::SMBFileId;
pub use impersonation_level::SMBImpersonationLevel;
pub use oplock::SMBOplockLevel;
pub use options::SMBCreateOptions;
pub use share_access::SMBShareAccess;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::filetime::FileTime;
use crate::protocol::body::tree_connect::access_mask::SMBFilePipePrinterAccessMask;

const REQUEST_STRUCTURE_SIZE: u16 = 57;
const RESPONSE_STRUCTURE_SIZE: u16 = 89;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBCreateRequest {
    pub oplock_level: SMBOplockLevel,
    pub impersonation_level: SMBImpersonationLevel,
    pub desired_access: SMBFilePipePrinterAccessMask,
    pub attributes: SMBFileAttributes,
    pub share_access: SMBShareAccess,
    pub create_disposition: SMBCreateDisposition,
    pub create_options: SMBCreateOptions,
    pub file_name: String,
    pub contexts: Vec<CreateContext>,
}

impl SMBCreateRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        reader.skip(1); // security flags, reserved
        let oplock_raw = reader.u8();
        let impersonation_raw = reader.u32();
        reader.skip(16); // smb create flags + reserved
        let desired_access_raw = reader.u32();
        let attributes = reader.u32();
        let share_access_raw = reader.u32();
        let create_disposition_raw = reader.u32();
        let create_options = reader.u32();
        let name_offset = reader.u16();
        let name_length = reader.u16();
        let context_offset = reader.u32();
        let context_count = reader.u32();

        let oplock_level = SMBOplockLevel::try_from(oplock_raw).map_err(|_| SMBError::wire_decode("bad oplock level"))?;
        let impersonation_level =
            SMBImpersonationLevel::try_from(impersonation_raw).map_err(|_| SMBError::wire_decode("bad impersonation level"))?;
        let create_disposition = SMBCreateDisposition::try_from(create_disposition_raw)
            .map_err(|_| SMBError::wire_decode("bad create disposition"))?;

        if name_offset < REQUEST_HEADER_LEN && name_length > 0 {
            return Err(SMBError::wire_decode("file name offset precedes message body"));
        }
        let file_name = if name_length == 0 {
            String::new()
        } else {
            reader.seek(name_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.utf16le(name_length as usize / 2)
        };

        let contexts = if context_count > 0 {
            reader.seek(context_offset as usize - REQUEST_HEADER_LEN as usize);
            (0..context_count)
                .map(|_| CreateContext::parse(reader))
                .collect::<SMBResult<_>>()?
        } else {
            Vec::new()
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        let create_options = SMBCreateOptions::from_bits_truncate(create_options);
        if create_options.rejected() {
            return Err(SMBError::wire_decode("RESERVE_OPFILTER may not be set"));
        }

        Ok(Self {
            oplock_level,
            impersonation_level,
            desired_access: SMBFilePipePrinterAccessMask::from_bits_truncate(desired_access_raw),
            attributes: SMBFileAttributes::from_bits_truncate(attributes),
            share_access: SMBShareAccess::from_bits_truncate(share_access_raw),
            create_disposition,
            create_options,
            file_name,
            contexts,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBCreateResponseBody {
    pub oplock_level: SMBOplockLevel,
    pub create_action: SMBCreateAction,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub file_attributes: SMBFileAttributes,
    pub file_id: SMBFileId,
    pub contexts: Vec<CreateContext>,
}

impl SMBCreateResponseBody {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u8(self.oplock_level as u8);
        writer.u8(0); // flags
        writer.u32(self.create_action as u32);
        self.creation_time.write(writer);
        self.last_access_time.write(writer);
        self.last_write_time.write(writer);
        self.change_time.write(writer);
        writer.u64(self.allocation_size);
        writer.u64(self.end_of_file);
        writer.u32(self.file_attributes.bits());
        writer.u32(0); // reserved2
        self.file_id.write(writer);

        let context_offset_field = writer.len();
        writer.u32(0);
        writer.u32(self.contexts.len() as u32);

        if self.contexts.is_empty() {
            writer.write_at(context_offset_field, &0u32.to_le_bytes());
        } else {
            writer.pad(8);
            let context_offset = writer.len() as u32;
            writer.write_at(context_offset_field, &context_offset.to_le_bytes());
            for ctx in &self.contexts {
                ctx.write(writer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_with_file_name() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(0); // security flags
        w.u8(SMBOplockLevel::Batch as u8);
        w.u32(SMBImpersonationLevel::Impersonation as u32);
        w.zeros(16);
        w.u32(SMBFilePipePrinterAccessMask::GENERIC_READ.bits());
        w.u32(SMBFileAttributes::NORMAL.bits());
        w.u32(SMBShareAccess::READ.bits());
        w.u32(SMBCreateDisposition::OpenIf as u32);
        w.u32(SMBCreateOptions::NON_DIRECTORY_FILE.bits());
        let name = "dir\\file.txt";
        w.u16(REQUEST_HEADER_LEN + 24);
        w.u16((name.encode_utf16().count() * 2) as u16);
        w.u32(0); // context offset
        w.u32(0); // context count
        w.utf16le(name);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBCreateRequest::parse(&mut r).unwrap();
        assert_eq!(req.file_name, name);
        assert_eq!(req.oplock_level, SMBOplockLevel::Batch);
        assert!(req.contexts.is_empty());
    }

    #[test]
    fn rejects_reserve_opfilter() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(0);
        w.u8(SMBOplockLevel::None as u8);
        w.u32(SMBImpersonationLevel::Anonymous as u32);
        w.zeros(16);
        w.u32(0);
        w.u32(0);
        w.u32(0);
        w.u32(SMBCreateDisposition::Open as u32);
        w.u32(SMBCreateOptions::RESERVE_OPFILTER.bits());
        w.u16(REQUEST_HEADER_LEN);
        w.u16(0);
        w.u32(0);
        w.u32(0);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert!(SMBCreateRequest::parse(&mut r).is_err());
    }
}
