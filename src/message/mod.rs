/*
Every SFTP v3 packet is framed as:

| u32: length | u8: type | u32: id | u8[length - 9]: body |

except INIT and VERSION, where the u32 after the type byte is the protocol
version instead of a request id. The length prefix excludes itself and is
owned by the framing layer; `Message::encode`/`Message::decode` operate on
everything after it.
 */

use bytes::{Buf, Bytes};

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

mod attrs;
mod data;
mod extended;
mod extended_reply;
mod handle;
mod name;
mod open;
mod path;
mod read;
mod rename;
mod status;
mod symlink;
mod version;
mod write;

pub use attrs::{ExtendedAttr, FileAttrs, FileMode, FileOwner, FileTime, FileType};
pub use data::Data;
pub use extended::ExtendedRequest;
pub use extended_reply::ExtendedReply;
pub use handle::{Handle, HandleAttrs};
pub use name::{DirEntry, Name};
pub use open::{pflags, Open};
pub use path::{Path, PathAttrs};
pub use read::Read;
pub use rename::Rename;
pub use status::{Status, StatusCode};
pub use symlink::Symlink;
pub use version::Version;
pub use write::Write;

/// The protocol version this client negotiates and speaks.
pub const VERSION: u32 = 3;

// Requests whose payload shape is shared reuse the carrying type.
pub type Init = Version;
pub type Close = Handle;
pub type LStat = Path;
pub type FStat = Handle;
pub type SetStat = PathAttrs;
pub type FSetStat = HandleAttrs;
pub type OpenDir = Path;
pub type ReadDir = Handle;
pub type Remove = Path;
pub type MkDir = PathAttrs;
pub type RmDir = Path;
pub type RealPath = Path;
pub type Stat = Path;
pub type ReadLink = Path;
pub type Attrs = FileAttrs;
pub type Extended = ExtendedRequest;

macro_rules! messages {
    ($($name:ident = $code:literal,)*) => {
        /// One SFTP packet, request or reply, without its frame header.
        #[derive(Debug, PartialEq, Eq, Clone)]
        #[non_exhaustive]
        pub enum Message {
            $($name($name),)*
        }

        /// The type tag of a [`Message`], without its payload.
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
        #[repr(u8)]
        #[non_exhaustive]
        pub enum MessageKind {
            $($name = $code,)*
        }

        impl Message {
            pub fn kind(&self) -> MessageKind {
                match self {
                    $(Self::$name(_) => MessageKind::$name,)*
                }
            }
        }

        impl MessageKind {
            pub fn code(self) -> u8 {
                self as u8
            }
        }
    };
}

messages! {
    Init = 1,
    Version = 2,
    Open = 3,
    Close = 4,
    Read = 5,
    Write = 6,
    LStat = 7,
    FStat = 8,
    SetStat = 9,
    FSetStat = 10,
    OpenDir = 11,
    ReadDir = 12,
    Remove = 13,
    MkDir = 14,
    RmDir = 15,
    RealPath = 16,
    Stat = 17,
    Rename = 18,
    ReadLink = 19,
    Symlink = 20,
    Status = 101,
    Handle = 102,
    Data = 103,
    Name = 104,
    Attrs = 105,
    Extended = 200,
    ExtendedReply = 201,
}

impl Message {
    /// Encode the frame payload: type byte, id (or version), body.
    ///
    /// The `id` argument is ignored for `Init` and `Version`, which carry
    /// their protocol version in that slot.
    pub fn encode(&self, id: u32) -> Result<Bytes, Error> {
        let mut vec = Vec::with_capacity(64);
        let buf = &mut vec;

        self.kind().code().encode(buf)?;

        match self {
            Self::Init(inner) | Self::Version(inner) => inner.version.encode(buf)?,
            _ => id.encode(buf)?,
        }

        match self {
            Self::Init(inner) | Self::Version(inner) => inner.encode(buf)?,
            Self::Open(inner) => inner.encode(buf)?,
            Self::Close(inner)
            | Self::FStat(inner)
            | Self::ReadDir(inner)
            | Self::Handle(inner) => inner.encode(buf)?,
            Self::Read(inner) => inner.encode(buf)?,
            Self::Write(inner) => inner.encode(buf)?,
            Self::LStat(inner)
            | Self::OpenDir(inner)
            | Self::Remove(inner)
            | Self::RmDir(inner)
            | Self::RealPath(inner)
            | Self::Stat(inner)
            | Self::ReadLink(inner) => inner.encode(buf)?,
            Self::SetStat(inner) | Self::MkDir(inner) => inner.encode(buf)?,
            Self::FSetStat(inner) => inner.encode(buf)?,
            Self::Rename(inner) => inner.encode(buf)?,
            Self::Symlink(inner) => inner.encode(buf)?,
            Self::Status(inner) => inner.encode(buf)?,
            Self::Data(inner) => inner.encode(buf)?,
            Self::Name(inner) => inner.as_slice().encode(buf)?,
            Self::Attrs(inner) => inner.encode(buf)?,
            Self::Extended(inner) => inner.encode(buf)?,
            Self::ExtendedReply(inner) => inner.encode(buf)?,
        }

        Ok(vec.into())
    }

    /// Decode one frame payload into its request id and message.
    ///
    /// `Init`/`Version` have no id and decode with id 0. Unknown type codes
    /// and leftover bytes are [`Error::Malformed`]: both mean the peer and
    /// this client disagree about the protocol, which is unrecoverable.
    pub fn decode(mut frame: Bytes) -> Result<(u32, Self), Error> {
        let kind = u8::decode(&mut frame)?;
        let id = u32::decode(&mut frame)?;

        let (id, message) = match kind {
            1 => {
                let mut init = Init::decode(&mut frame)?;
                init.version = id;
                (0, Self::Init(init))
            }
            2 => {
                let mut version = Version::decode(&mut frame)?;
                version.version = id;
                (0, Self::Version(version))
            }
            3 => (id, Self::Open(SftpDecode::decode(&mut frame)?)),
            4 => (id, Self::Close(SftpDecode::decode(&mut frame)?)),
            5 => (id, Self::Read(SftpDecode::decode(&mut frame)?)),
            6 => (id, Self::Write(SftpDecode::decode(&mut frame)?)),
            7 => (id, Self::LStat(SftpDecode::decode(&mut frame)?)),
            8 => (id, Self::FStat(SftpDecode::decode(&mut frame)?)),
            9 => (id, Self::SetStat(SftpDecode::decode(&mut frame)?)),
            10 => (id, Self::FSetStat(SftpDecode::decode(&mut frame)?)),
            11 => (id, Self::OpenDir(SftpDecode::decode(&mut frame)?)),
            12 => (id, Self::ReadDir(SftpDecode::decode(&mut frame)?)),
            13 => (id, Self::Remove(SftpDecode::decode(&mut frame)?)),
            14 => (id, Self::MkDir(SftpDecode::decode(&mut frame)?)),
            15 => (id, Self::RmDir(SftpDecode::decode(&mut frame)?)),
            16 => (id, Self::RealPath(SftpDecode::decode(&mut frame)?)),
            17 => (id, Self::Stat(SftpDecode::decode(&mut frame)?)),
            18 => (id, Self::Rename(SftpDecode::decode(&mut frame)?)),
            19 => (id, Self::ReadLink(SftpDecode::decode(&mut frame)?)),
            20 => (id, Self::Symlink(SftpDecode::decode(&mut frame)?)),
            101 => (id, Self::Status(SftpDecode::decode(&mut frame)?)),
            102 => (id, Self::Handle(SftpDecode::decode(&mut frame)?)),
            103 => (id, Self::Data(SftpDecode::decode(&mut frame)?)),
            104 => (id, Self::Name(SftpDecode::decode(&mut frame)?)),
            105 => (id, Self::Attrs(SftpDecode::decode(&mut frame)?)),
            200 => (id, Self::Extended(SftpDecode::decode(&mut frame)?)),
            201 => (id, Self::ExtendedReply(SftpDecode::decode(&mut frame)?)),
            _ => return Err(Error::Malformed("unknown packet type")),
        };

        if frame.has_remaining() {
            return Err(Error::Malformed("trailing bytes in packet"));
        }

        Ok((id, message))
    }
}
