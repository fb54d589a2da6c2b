use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_NAME_INFORMATION (MS-FSCC 2.4.28) — variable length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNameInformation {
    pub file_name: String,
}

impl FileNameInformation {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let file_name_length = reader.u32();
        let file_name = reader.utf16le(file_name_length as usize / 2);
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { file_name })
    }

    pub fn write(&self, writer: &mut Writer) {
        let byte_len = (self.file_name.encode_utf16().count() * 2) as u32;
        writer.u32(byte_len);
        writer.utf16le(&self.file_name);
    }

    pub fn wire_size(&self) -> usize {
        4 + self.file_name.encode_utf16().count() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let info = FileNameInformation { file_name: "testfile.txt".to_string() };
        let mut w = Writer::new();
        info.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), info.wire_size());
        let mut r = Reader::new(&bytes);
        assert_eq!(FileNameInformation::parse(&mut r).unwrap(), info);
    }
}
