/*
SSH_FXP_SYMLINK request:

| u32: id | string: linkpath | string: targetpath |
-> STATUS
 */

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

use super::Path;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Symlink {
    pub link_path: Path,
    pub target_path: Path,
}

impl SftpDecode for Symlink {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let link_path = Path::decode(buf)?;
        let target_path = Path::decode(buf)?;
        Ok(Symlink {
            link_path,
            target_path,
        })
    }
}

impl SftpEncode for &Symlink {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.link_path.encode(buf)?;
        self.target_path.encode(buf)?;
        Ok(())
    }
}
