/*
SSH_FXP_NAME reply:

| u32: id | u32: count | (string filename, string longname, attrs){count} |
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

use super::{FileAttrs, Path};

/// One batch of directory entries, in server order.
pub type Name = Vec<DirEntry>;

/// A single directory listing entry.
///
/// `long_name` is the server's human-readable `ls -l` style rendering; its
/// format is not specified and must not be parsed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DirEntry {
    pub filename: Path,
    pub long_name: Bytes,
    pub attrs: FileAttrs,
}

impl SftpDecode for DirEntry {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let filename = Path::decode(buf)?;
        let long_name = Bytes::decode(buf)?;
        let attrs = FileAttrs::decode(buf)?;

        Ok(DirEntry {
            filename,
            long_name,
            attrs,
        })
    }
}

impl SftpEncode for &DirEntry {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.filename.encode(buf)?;
        self.long_name.encode(buf)?;
        self.attrs.encode(buf)?;
        Ok(())
    }
}
