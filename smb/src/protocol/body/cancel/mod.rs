use smb_core::codec::Reader;
use smb_core::SMBResult;

const STRUCTURE_SIZE: u16 = 4;

/// CANCEL carries no response; the cancelled request's own response (if any)
/// completes with `STATUS_CANCELLED` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBCancelRequest;

impl SMBCancelRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(STRUCTURE_SIZE);
        reader.skip(2); // reserved

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self)
    }
}
