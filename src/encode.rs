use bytes::{BufMut, Bytes};

use crate::error::Error;

/// Wire encoding of one protocol field.
///
/// Implemented on references for compound types so encoding never takes
/// ownership of message payloads.
pub(crate) trait SftpEncode {
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error>;
}

impl SftpEncode for u8 {
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error> {
        buf.put_u8(self);
        Ok(())
    }
}

impl SftpEncode for u32 {
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error> {
        buf.put_u32(self);
        Ok(())
    }
}

impl SftpEncode for u64 {
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error> {
        buf.put_u64(self);
        Ok(())
    }
}

impl SftpEncode for &Bytes {
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error> {
        let length =
            u32::try_from(self.len()).map_err(|_| Error::Malformed("string too long"))?;
        length.encode(buf)?;
        buf.put_slice(self);
        Ok(())
    }
}

impl<'a, T> SftpEncode for &'a [T]
where
    &'a T: SftpEncode,
{
    fn encode(self, buf: &mut dyn BufMut) -> Result<(), Error> {
        let count = u32::try_from(self.len()).map_err(|_| Error::Malformed("list too long"))?;
        count.encode(buf)?;
        for element in self {
            element.encode(buf)?;
        }
        Ok(())
    }
}
