use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBFilePipePrinterAccessMask: u32 {
        const FILE_READ_DATA         = 0x0000_0001;
        const FILE_WRITE_DATA        = 0x0000_0002;
        const FILE_APPEND_DATA       = 0x0000_0004;
        const FILE_READ_EA           = 0x0000_0008;
        const FILE_WRITE_EA          = 0x0000_0010;
        const FILE_EXECUTE           = 0x0000_0020;
        const FILE_DELETE_CHILD      = 0x0000_0040;
        const FILE_READ_ATTRIBUTES   = 0x0000_0080;
        const FILE_WRITE_ATTRIBUTES  = 0x0000_0100;
        const DELETE                 = 0x0001_0000;
        const READ_CONTROL           = 0x0002_0000;
        const WRITE_DAC              = 0x0004_0000;
        const WRITE_OWNER            = 0x0008_0000;
        const SYNCHRONIZE            = 0x0010_0000;
        const ACCESS_SYSTEM_SECURITY = 0x0100_0000;
        const MAXIMUM_ALLOWED        = 0x0200_0000;
        const GENERIC_ALL            = 0x1000_0000;
        const GENERIC_EXECUTE        = 0x2000_0000;
        const GENERIC_WRITE          = 0x4000_0000;
        const GENERIC_READ           = 0x8000_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBDirectoryAccessMask: u32 {
        const FILE_LIST_DIRECTORY    = 0x0000_0001;
        const FILE_ADD_FILE          = 0x0000_0002;
        const FILE_ADD_SUBDIRECTORY  = 0x0000_0004;
        const FILE_READ_EA           = 0x0000_0008;
        const FILE_WRITE_EA          = 0x0000_0010;
        const FILE_TRAVERSE          = 0x0000_0020;
        const FILE_DELETE_CHILD      = 0x0000_0040;
        const FILE_READ_ATTRIBUTES   = 0x0000_0080;
        const FILE_WRITE_ATTRIBUTES  = 0x0000_0100;
        const DELETE                 = 0x0001_0000;
        const READ_CONTROL           = 0x0002_0000;
        const WRITE_DAC              = 0x0004_0000;
        const WRITE_OWNER            = 0x0008_0000;
        const SYNCHRONIZE            = 0x0010_0000;
        const ACCESS_SYSTEM_SECURITY = 0x0100_0000;
        const MAXIMUM_ALLOWED        = 0x0200_0000;
        const GENERIC_ALL            = 0x1000_0000;
        const GENERIC_EXECUTE        = 0x2000_0000;
        const GENERIC_WRITE          = 0x4000_0000;
        const GENERIC_READ           = 0x8000_0000;
    }
}

/// `desired_access`/`maximal_access` fields interpret the same 32 bits
/// differently depending on whether the target is a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SMBAccessMask {
    FilePipePrinter(SMBFilePipePrinterAccessMask),
    Directory(SMBDirectoryAccessMask),
}

impl SMBAccessMask {
    pub fn file_pipe_printer(mask: SMBFilePipePrinterAccessMask) -> Self {
        Self::FilePipePrinter(mask)
    }

    pub fn directory(mask: SMBDirectoryAccessMask) -> Self {
        Self::Directory(mask)
    }

    pub fn bits(&self) -> u32 {
        match self {
            Self::FilePipePrinter(m) => m.bits(),
            Self::Directory(m) => m.bits(),
        }
    }

    pub fn parse_file(reader: &mut Reader) -> SMBResult<Self> {
        let raw = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self::FilePipePrinter(SMBFilePipePrinterAccessMask::from_bits_truncate(raw)))
    }

    pub fn parse_directory(reader: &mut Reader) -> SMBResult<Self> {
        let raw = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self::Directory(SMBDirectoryAccessMask::from_bits_truncate(raw)))
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32(self.bits());
    }
}
