/*
SSH_FXP_OPEN request:

| u32: id | string: filename | u32: pflags | attrs |
-> HANDLE | STATUS
 */

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

use super::{FileAttrs, Path};

/// Open flags for [`Open::pflags`].
///
/// `TRUNCATE` and `EXCLUDE` are only meaningful together with `CREATE`;
/// the server enforces that, not this client.
pub mod pflags {
    pub const READ: u32 = 0x0000_0001;
    pub const WRITE: u32 = 0x0000_0002;
    pub const APPEND: u32 = 0x0000_0004;
    pub const CREATE: u32 = 0x0000_0008;
    pub const TRUNCATE: u32 = 0x0000_0010;
    pub const EXCLUDE: u32 = 0x0000_0020;
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Open {
    pub filename: Path,
    pub pflags: u32,
    pub attrs: FileAttrs,
}

impl SftpDecode for Open {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let filename = Path::decode(buf)?;
        let pflags = u32::decode(buf)?;
        let attrs = FileAttrs::decode(buf)?;

        Ok(Open {
            filename,
            pflags,
            attrs,
        })
    }
}

impl SftpEncode for &Open {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.filename.encode(buf)?;
        self.pflags.encode(buf)?;
        self.attrs.encode(buf)?;
        Ok(())
    }
}
