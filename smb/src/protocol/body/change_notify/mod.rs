pub mod completion_filter;
pub mod flags;

pub use completion_filter::SMBCompletionFilter;
pub use flags::SMBChangeNotifyFlags;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;

const REQUEST_STRUCTURE_SIZE: u16 = 32;
const RESPONSE_STRUCTURE_SIZE: u16 = 9;
const REQUEST_HEADER_LEN: u16 = 64;

/// FILE_ACTION_* codes reported in a FILE_NOTIFY_INFORMATION entry.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBNotifyAction {
    Added = 0x1,
    Removed = 0x2,
    Modified = 0x3,
    RenamedOldName = 0x4,
    RenamedNewName = 0x5,
    AddedStream = 0x6,
    RemovedStream = 0x7,
    ModifiedStream = 0x8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBChangeNotifyRequest {
    pub flags: SMBChangeNotifyFlags,
    pub output_buffer_length: u32,
    pub file_id: SMBFileId,
    pub completion_filter: SMBCompletionFilter,
}

impl SMBChangeNotifyRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let flags = SMBChangeNotifyFlags::from_bits_truncate(reader.u16());
        let output_buffer_length = reader.u32();
        let file_id = SMBFileId::parse(reader)?;
        let completion_filter = SMBCompletionFilter::from_bits_truncate(reader.u32());
        reader.skip(4); // reserved

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { flags, output_buffer_length, file_id, completion_filter })
    }
}

/// One reported change, as it appears in a CHANGE_NOTIFY response's
/// FILE_NOTIFY_INFORMATION array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNotifyEntry {
    pub action: SMBNotifyAction,
    pub file_name: String,
}

impl FileNotifyEntry {
    /// Writes this entry and returns its byte length, so the caller can
    /// back-patch the preceding entry's `next_entry_offset` and insert the
    /// 4-byte alignment padding MS-SMB2 requires between entries.
    pub fn write(&self, writer: &mut Writer) -> usize {
        let start = writer.len();
        writer.u32(0); // next_entry_offset, back-patched by the caller
        writer.u32(self.action.into());
        let name_utf16: Vec<u16> = self.file_name.encode_utf16().collect();
        writer.u32(name_utf16.len() as u32 * 2);
        for unit in name_utf16 {
            writer.u16(unit);
        }
        writer.len() - start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SMBChangeNotifyResponse {
    pub entries: Vec<FileNotifyEntry>,
}

impl SMBChangeNotifyResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        let buffer_offset_field = writer.len();
        writer.u16(0);
        let length_field = writer.len();
        writer.u32(0);

        let buffer_start = writer.len();
        let mut entry_field_starts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry_field_starts.push(writer.len());
            entry.write(writer);
            writer.pad(4);
        }
        for (idx, field_start) in entry_field_starts.iter().enumerate() {
            if idx + 1 < entry_field_starts.len() {
                let next = entry_field_starts[idx + 1] - field_start;
                writer.write_at(*field_start, &(next as u32).to_le_bytes());
            }
        }
        let buffer_len = writer.len() - buffer_start;

        writer.write_at(buffer_offset_field, &((REQUEST_HEADER_LEN + RESPONSE_STRUCTURE_SIZE - 1) as u16).to_le_bytes());
        writer.write_at(length_field, &(buffer_len as u32).to_le_bytes());
    }
}
