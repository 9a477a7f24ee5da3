/*
SSH_FXP_INIT and SSH_FXP_VERSION:

| u32: version | (string name, string value)* |

The u32 that carries the request id in every other packet carries the
protocol version here; the envelope codec handles that swap.
 */

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Version {
    pub version: u32,
    pub extensions: BTreeMap<Bytes, Bytes>,
}

impl SftpDecode for Version {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let mut version = Version::default();

        while buf.remaining() >= 2 * std::mem::size_of::<u32>() {
            let name = Bytes::decode(buf)?;
            let value = Bytes::decode(buf)?;
            version.extensions.insert(name, value);
        }

        Ok(version)
    }
}

impl SftpEncode for &Version {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        for (name, value) in &self.extensions {
            name.encode(buf)?;
            value.encode(buf)?;
        }
        Ok(())
    }
}
