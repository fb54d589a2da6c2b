use smb_core::codec::Writer;

/// Body used by responses that carry no payload beyond the SMB2 header
/// (LOCK, FLUSH, and similar acknowledgement-only commands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBEmpty;

impl SMBEmpty {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(4);
        writer.zeros(2);
    }
}
