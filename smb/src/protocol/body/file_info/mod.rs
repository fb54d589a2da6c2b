//! MS-FSCC file information classes used in QUERY_INFO / SET_INFO /
//! QUERY_DIRECTORY responses.

pub mod access;
pub mod alignment;
pub mod basic;
pub mod ea;
pub mod internal;
pub mod mode;
pub mod name;
pub mod network_open;
pub mod position;
pub mod standard;

pub use access::FileAccessInformation;
pub use alignment::FileAlignmentInformation;
pub use basic::FileBasicInformation;
pub use ea::FileEaInformation;
pub use internal::FileInternalInformation;
pub use mode::FileModeInformation;
pub use name::FileNameInformation;
pub use network_open::FileNetworkOpenInformation;
pub use position::FilePositionInformation;
pub use standard::FileStandardInformation;

use smb_core::codec::Writer;

/// FILE_ALL_INFORMATION (MS-FSCC 2.4.2), built by concatenating its
/// sub-structures rather than as one flat struct — mirrors how the file
/// system actually stores each piece separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAllInformation {
    pub basic: FileBasicInformation,
    pub standard: FileStandardInformation,
    pub internal: FileInternalInformation,
    pub ea: FileEaInformation,
    pub access: FileAccessInformation,
    pub position: FilePositionInformation,
    pub mode: FileModeInformation,
    pub alignment: FileAlignmentInformation,
    pub name: FileNameInformation,
}

impl FileAllInformation {
    pub fn write(&self, writer: &mut Writer) {
        self.basic.write(writer);
        self.standard.write(writer);
        self.internal.write(writer);
        self.ea.write(writer);
        self.access.write(writer);
        self.position.write(writer);
        self.mode.write(writer);
        self.alignment.write(writer);
        self.name.write(writer);
    }
}

/// One entry of FILE_ID_BOTH_DIR_INFORMATION (MS-FSCC 2.4.17), the
/// information class this server emits for QUERY_DIRECTORY. `next_offset`
/// is back-patched by the caller once every entry's length is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdBothDirectoryInformationEntry {
    pub file_index: u32,
    pub basic: FileBasicInformation,
    pub end_of_file: u64,
    pub allocation_size: u64,
    pub file_id: u64,
    pub file_name: String,
}

impl FileIdBothDirectoryInformationEntry {
    /// Writes one entry (without the trailing `next_offset` patch) and
    /// returns the byte length so the caller can align/patch `next_offset`.
    pub fn write(&self, writer: &mut Writer) -> usize {
        let start = writer.len();
        writer.u32(0); // next_entry_offset, patched by caller
        writer.u32(self.file_index);
        self.basic.write(writer);
        writer.u64(self.allocation_size);
        writer.u64(self.end_of_file);
        let name_len = (self.file_name.encode_utf16().count() * 2) as u32;
        writer.u32(name_len);
        writer.u32(0); // ea_size
        writer.u8(0); // short name length
        writer.u8(0); // reserved
        writer.zeros(24); // short name (12 UTF-16 chars, unused)
        writer.u64(self.file_id);
        writer.utf16le(&self.file_name);
        writer.len() - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::body::create::file_attributes::SMBFileAttributes;
    use crate::protocol::body::filetime::FileTime;

    fn sample_basic() -> FileBasicInformation {
        FileBasicInformation {
            creation_time: FileTime::zero(),
            last_access_time: FileTime::zero(),
            last_write_time: FileTime::zero(),
            change_time: FileTime::zero(),
            file_attributes: SMBFileAttributes::NORMAL,
        }
    }

    #[test]
    fn file_all_information_concatenates_every_substruct() {
        let all = FileAllInformation {
            basic: sample_basic(),
            standard: FileStandardInformation { allocation_size: 4096, end_of_file: 21, number_of_links: 1, delete_pending: false, directory: false },
            internal: FileInternalInformation { index_number: 0 },
            ea: FileEaInformation { ea_size: 0 },
            access: FileAccessInformation { access_flags: 0x001f_01ff },
            position: FilePositionInformation { current_byte_offset: 0 },
            mode: FileModeInformation { mode: 0 },
            alignment: FileAlignmentInformation { alignment_requirement: 0 },
            name: FileNameInformation { file_name: "testfile.txt".into() },
        };
        let mut w = Writer::new();
        all.write(&mut w);
        let expected = FileBasicInformation::WIRE_SIZE
            + FileStandardInformation::WIRE_SIZE
            + FileInternalInformation::WIRE_SIZE
            + FileEaInformation::WIRE_SIZE
            + FileAccessInformation::WIRE_SIZE
            + FilePositionInformation::WIRE_SIZE
            + FileModeInformation::WIRE_SIZE
            + FileAlignmentInformation::WIRE_SIZE
            + all.name.wire_size();
        assert_eq!(w.len(), expected);
    }

    #[test]
    fn directory_entry_reports_its_own_length() {
        let entry = FileIdBothDirectoryInformationEntry {
            file_index: 0,
            basic: sample_basic(),
            end_of_file: 0,
            allocation_size: 0,
            file_id: 7,
            file_name: "a.txt".to_string(),
        };
        let mut w = Writer::new();
        let len = entry.write(&mut w);
        assert_eq!(len, w.len());
    }
}
