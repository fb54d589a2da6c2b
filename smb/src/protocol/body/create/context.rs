use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// A single CREATE context (`MxAc`, `DH2Q`, `RqLs`, ...). This server
/// only needs to preserve context tags and bodies across a create, not
/// interpret the durable-handle/lease negotiation they carry, so each
/// context round-trips as an opaque name+data pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContext {
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

impl CreateContext {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let start = reader.position();
        let next = reader.u32();
        let name_offset = reader.u16();
        let name_length = reader.u16();
        reader.skip(2); // reserved
        let data_offset = reader.u16();
        let data_length = reader.u32();

        reader.seek(start + name_offset as usize);
        let name = reader.bytes(name_length as usize).to_vec();
        reader.align(8);
        reader.seek(start + data_offset as usize);
        let data = reader.bytes(data_length as usize).to_vec();

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        if next != 0 {
            reader.seek(start + next as usize);
        }
        Ok(Self { name, data })
    }

    pub fn write(&self, writer: &mut Writer) {
        let start = writer.len();
        let next_field = writer.len();
        writer.u32(0); // patched by caller once chain length is known
        writer.u16(16); // name always immediately follows the 16-byte header
        writer.u16(self.name.len() as u16);
        writer.zeros(2);
        let data_offset_field = writer.len();
        writer.u16(0); // patched below
        writer.u32(self.data.len() as u32);
        writer.bytes(&self.name);
        writer.pad(8);
        let data_offset = (writer.len() - start) as u16;
        writer.write_at(data_offset_field, &data_offset.to_le_bytes());
        writer.bytes(&self.data);
        writer.pad(8);
        let _ = next_field;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_single_context() {
        let ctx = CreateContext { name: b"MxAc".to_vec(), data: vec![1, 2, 3, 4] };
        let mut w = Writer::new();
        ctx.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let parsed = CreateContext::parse(&mut r).unwrap();
        assert_eq!(parsed, ctx);
    }
}
