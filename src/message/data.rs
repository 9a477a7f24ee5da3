/*
SSH_FXP_DATA reply:

| u32: id | string: data |
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

/// A chunk of file contents returned by READ.
///
/// May be shorter than requested; end of file arrives as `STATUS(EOF)`
/// instead of an empty chunk.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Data(pub Bytes);

impl Data {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SftpDecode for Data {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        Ok(Data(Bytes::decode(buf)?))
    }
}

impl SftpEncode for &Data {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.0.encode(buf)
    }
}
