use smb_core::codec::Writer;

const STRUCTURE_SIZE: u16 = 9;

/// The SMB2 ERROR response body (MS-SMB2 §2.2.2). The error code itself
/// lives in the containing header's `status` field; this body only ever
/// carries the zero-length `error_data` this server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBErrorResponse;

impl SMBErrorResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(STRUCTURE_SIZE);
        writer.zeros(1); // error_context_count
        writer.zeros(1); // reserved
        writer.u32(0); // byte_count
    }
}
