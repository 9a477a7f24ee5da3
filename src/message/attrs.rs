/*
Attribute block, shared by OPEN/SETSTAT/FSETSTAT/MKDIR requests and the
ATTRS and NAME replies:

| u32: flags | {size} u64 | {uidgid} u32 uid, u32 gid | {perm} u32 mode
| {acmodtime} u32 atime, u32 mtime | {extended} u32 count, (string, string)* |

Each field is present only when its flag bit is set, in the order above.
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
enum AttrFlags {
    Size = 0x0000_0001,
    Owner = 0x0000_0002,
    Perms = 0x0000_0004,
    Time = 0x0000_0008,
    Extended = 0x8000_0000,
}

/// Numeric owner of a remote file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FileOwner {
    pub uid: u32,
    pub gid: u32,
}

/// Access and modification times, in seconds since the Unix epoch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FileTime {
    pub atime: u32,
    pub mtime: u32,
}

/// A vendor extension attribute: an opaque `(type, data)` string pair.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExtendedAttr {
    pub kind: Bytes,
    pub data: Bytes,
}

/// The POSIX mode word: a 4-bit file type plus 12 permission bits.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const TYPE_MASK: u32 = 0xF000;
    pub const PERMISSION_MASK: u32 = 0x0FFF;

    pub const SETUID: u32 = 0x800;
    pub const SETGID: u32 = 0x400;
    pub const STICKY: u32 = 0x200;

    pub fn file_type(self) -> FileType {
        FileType::from_mode(self.0)
    }

    /// The 12 permission bits, type nibble stripped.
    pub fn permissions(self) -> u32 {
        self.0 & Self::PERMISSION_MASK
    }

    pub fn is_directory(self) -> bool {
        self.file_type() == FileType::Directory
    }

    pub fn is_regular(self) -> bool {
        self.file_type() == FileType::Regular
    }

    pub fn is_symlink(self) -> bool {
        self.file_type() == FileType::Symlink
    }
}

/// File type extracted from the mode word.
///
/// Type nibbles outside the known set are preserved verbatim.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    Fifo,
    Character,
    Directory,
    Block,
    Regular,
    Symlink,
    Socket,
    Unknown(u32),
}

impl FileType {
    pub fn from_mode(mode: u32) -> Self {
        match mode & FileMode::TYPE_MASK {
            0x1000 => Self::Fifo,
            0x2000 => Self::Character,
            0x4000 => Self::Directory,
            0x6000 => Self::Block,
            0x8000 => Self::Regular,
            0xA000 => Self::Symlink,
            0xC000 => Self::Socket,
            other => Self::Unknown(other),
        }
    }
}

/// File attributes with per-field presence.
///
/// Absent fields are simply not on the wire; `Default` encodes as a bare
/// zero flag word.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FileAttrs {
    pub size: Option<u64>,
    pub owner: Option<FileOwner>,
    pub perms: Option<FileMode>,
    pub time: Option<FileTime>,
    pub extended: Vec<ExtendedAttr>,
}

impl SftpDecode for FileAttrs {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let mut attrs = FileAttrs::default();
        let flags = u32::decode(buf)?;

        if (flags & AttrFlags::Size as u32) != 0 {
            attrs.size = Some(u64::decode(buf)?);
        }
        if (flags & AttrFlags::Owner as u32) != 0 {
            let uid = u32::decode(buf)?;
            let gid = u32::decode(buf)?;
            attrs.owner = Some(FileOwner { uid, gid });
        }
        if (flags & AttrFlags::Perms as u32) != 0 {
            attrs.perms = Some(FileMode(u32::decode(buf)?));
        }
        if (flags & AttrFlags::Time as u32) != 0 {
            let atime = u32::decode(buf)?;
            let mtime = u32::decode(buf)?;
            attrs.time = Some(FileTime { atime, mtime });
        }
        if (flags & AttrFlags::Extended as u32) != 0 {
            attrs.extended = Vec::decode(buf)?;
        }

        Ok(attrs)
    }
}

impl SftpEncode for &FileAttrs {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        let mut flags = 0u32;

        if self.size.is_some() {
            flags |= AttrFlags::Size as u32;
        }
        if self.owner.is_some() {
            flags |= AttrFlags::Owner as u32;
        }
        if self.perms.is_some() {
            flags |= AttrFlags::Perms as u32;
        }
        if self.time.is_some() {
            flags |= AttrFlags::Time as u32;
        }
        if !self.extended.is_empty() {
            flags |= AttrFlags::Extended as u32;
        }

        flags.encode(buf)?;

        if let Some(size) = self.size {
            size.encode(buf)?;
        }
        if let Some(owner) = self.owner {
            owner.uid.encode(buf)?;
            owner.gid.encode(buf)?;
        }
        if let Some(perms) = self.perms {
            perms.0.encode(buf)?;
        }
        if let Some(time) = self.time {
            time.atime.encode(buf)?;
            time.mtime.encode(buf)?;
        }
        if !self.extended.is_empty() {
            self.extended.as_slice().encode(buf)?;
        }

        Ok(())
    }
}

impl SftpDecode for ExtendedAttr {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let kind = Bytes::decode(buf)?;
        let data = Bytes::decode(buf)?;
        Ok(ExtendedAttr { kind, data })
    }
}

impl SftpEncode for &ExtendedAttr {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.kind.encode(buf)?;
        self.data.encode(buf)?;
        Ok(())
    }
}
