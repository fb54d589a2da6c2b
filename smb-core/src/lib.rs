use error::SMBError;

pub mod codec;
pub mod error;
pub mod logging;
pub mod nt_status;

pub type SMBResult<T> = Result<T, SMBError>;

/// Implemented by every wire-level request/response body. Kept as a thin
/// marker over [`codec::Reader`]/[`codec::Writer`] so call sites can stay
/// generic (`T::parse(&mut reader)`) instead of hand-rolling decode calls.
pub trait SMBFromBytes: Sized {
    fn parse(reader: &mut codec::Reader) -> SMBResult<Self>;
}

pub trait SMBToBytes {
    fn write(&self, writer: &mut codec::Writer);
}

pub trait SMBByteSize {
    fn smb_byte_size(&self) -> usize;
}

impl SMBFromBytes for u8 {
    fn parse(reader: &mut codec::Reader) -> SMBResult<Self> {
        let v = reader.u8();
        reader.take_error().map_or(Ok(v), Err)
    }
}

impl SMBFromBytes for u16 {
    fn parse(reader: &mut codec::Reader) -> SMBResult<Self> {
        let v = reader.u16();
        reader.take_error().map_or(Ok(v), Err)
    }
}

impl SMBFromBytes for u32 {
    fn parse(reader: &mut codec::Reader) -> SMBResult<Self> {
        let v = reader.u32();
        reader.take_error().map_or(Ok(v), Err)
    }
}

impl SMBFromBytes for u64 {
    fn parse(reader: &mut codec::Reader) -> SMBResult<Self> {
        let v = reader.u64();
        reader.take_error().map_or(Ok(v), Err)
    }
}

impl SMBToBytes for u8 {
    fn write(&self, writer: &mut codec::Writer) {
        writer.u8(*self);
    }
}

impl SMBToBytes for u16 {
    fn write(&self, writer: &mut codec::Writer) {
        writer.u16(*self);
    }
}

impl SMBToBytes for u32 {
    fn write(&self, writer: &mut codec::Writer) {
        writer.u32(*self);
    }
}

impl SMBToBytes for u64 {
    fn write(&self, writer: &mut codec::Writer) {
        writer.u64(*self);
    }
}
