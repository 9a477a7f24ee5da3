use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

use super::FileAttrs;

/// A remote path.
///
/// SFTP paths are length-prefixed byte strings with no encoding guarantee,
/// so the raw bytes are kept; [`Path::display`]-style rendering is lossy.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Path(pub Bytes);

impl Path {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<T: Into<Bytes>> From<T> for Path {
    fn from(value: T) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl SftpDecode for Path {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        Ok(Path(Bytes::decode(buf)?))
    }
}

impl SftpEncode for &Path {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.0.encode(buf)
    }
}

/// A path plus an attribute block (SETSTAT and MKDIR requests).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PathAttrs {
    pub path: Path,
    pub attrs: FileAttrs,
}

impl SftpDecode for PathAttrs {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let path = Path::decode(buf)?;
        let attrs = FileAttrs::decode(buf)?;
        Ok(PathAttrs { path, attrs })
    }
}

impl SftpEncode for &PathAttrs {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.path.encode(buf)?;
        self.attrs.encode(buf)?;
        Ok(())
    }
}
