/*
SSH_FXP_HANDLE reply and the payload of CLOSE/FSTAT/READDIR requests:

| u32: id | string: handle |
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

use super::FileAttrs;

/// An opaque server-issued token for an open file or directory.
///
/// The server chooses the contents (1 to 256 bytes); the client only ever
/// echoes it back.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Handle(pub Bytes);

impl Handle {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl SftpDecode for Handle {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        Ok(Handle(Bytes::decode(buf)?))
    }
}

impl SftpEncode for &Handle {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.0.encode(buf)
    }
}

/// A handle plus an attribute block (FSETSTAT request).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HandleAttrs {
    pub handle: Handle,
    pub attrs: FileAttrs,
}

impl SftpDecode for HandleAttrs {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let handle = Handle::decode(buf)?;
        let attrs = FileAttrs::decode(buf)?;
        Ok(HandleAttrs { handle, attrs })
    }
}

impl SftpEncode for &HandleAttrs {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.handle.encode(buf)?;
        self.attrs.encode(buf)?;
        Ok(())
    }
}
