/*
SSH_FXP_EXTENDED request:

| u32: id | string: request-name | u8[rest]: data |
-> EXTENDED_REPLY | STATUS
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

/// A vendor extension request; the payload is opaque to this client.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExtendedRequest {
    pub request: Bytes,
    pub data: Bytes,
}

impl SftpDecode for ExtendedRequest {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let request = Bytes::decode(buf)?;
        let data = buf.copy_to_bytes(buf.remaining());
        Ok(ExtendedRequest { request, data })
    }
}

impl SftpEncode for &ExtendedRequest {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.request.encode(buf)?;
        buf.put_slice(&self.data);
        Ok(())
    }
}
