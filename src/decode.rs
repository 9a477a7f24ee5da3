use bytes::{Buf, Bytes};

use crate::error::Error;

/// Wire decoding of one protocol field.
///
/// All integers are big-endian; strings are a `u32` length followed by raw
/// bytes. Running out of buffer is a [`Error::Malformed`] fault, which is
/// fatal to the session.
pub(crate) trait SftpDecode: Sized {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error>;
}

impl SftpDecode for u8 {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error> {
        if buf.remaining() >= std::mem::size_of::<u8>() {
            Ok(buf.get_u8())
        } else {
            Err(Error::Malformed("truncated byte"))
        }
    }
}

impl SftpDecode for u32 {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error> {
        if buf.remaining() >= std::mem::size_of::<u32>() {
            Ok(buf.get_u32())
        } else {
            Err(Error::Malformed("truncated u32"))
        }
    }
}

impl SftpDecode for u64 {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error> {
        if buf.remaining() >= std::mem::size_of::<u64>() {
            Ok(buf.get_u64())
        } else {
            Err(Error::Malformed("truncated u64"))
        }
    }
}

impl SftpDecode for Bytes {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error> {
        let length = u32::decode(buf)? as usize;
        if buf.remaining() >= length {
            Ok(buf.copy_to_bytes(length))
        } else {
            Err(Error::Malformed("string length exceeds packet"))
        }
    }
}

impl<T: SftpDecode> SftpDecode for Vec<T> {
    fn decode(buf: &mut dyn Buf) -> Result<Self, Error> {
        let count = u32::decode(buf)? as usize;

        // The count comes off the wire; never trust it for preallocation.
        let mut vec = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            vec.push(T::decode(buf)?);
        }

        Ok(vec)
    }
}
