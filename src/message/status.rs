/*
SSH_FXP_STATUS reply:

| u32: id | u32: code | string: message | string: language |
 */

use bytes::Bytes;

use crate::decode::SftpDecode;
use crate::encode::SftpEncode;
use crate::error::Error;

/// Status codes defined for SFTP v3.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    Ok = 0,
    Eof = 1,
    NoSuchFile = 2,
    PermissionDenied = 3,
    Failure = 4,
    BadMessage = 5,
    NoConnection = 6,
    ConnectionLost = 7,
    OpUnsupported = 8,
}

impl TryFrom<u32> for StatusCode {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, u32> {
        match value {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Eof),
            2 => Ok(Self::NoSuchFile),
            3 => Ok(Self::PermissionDenied),
            4 => Ok(Self::Failure),
            5 => Ok(Self::BadMessage),
            6 => Ok(Self::NoConnection),
            7 => Ok(Self::ConnectionLost),
            8 => Ok(Self::OpUnsupported),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusCode::Ok => "ok",
            StatusCode::Eof => "end of file",
            StatusCode::NoSuchFile => "no such file",
            StatusCode::PermissionDenied => "permission denied",
            StatusCode::Failure => "failure",
            StatusCode::BadMessage => "bad message",
            StatusCode::NoConnection => "no connection",
            StatusCode::ConnectionLost => "connection lost",
            StatusCode::OpUnsupported => "operation not supported",
        };
        f.write_str(s)
    }
}

/// A status reply. Code 0 is success; everything else is an error, except
/// that `Eof` terminates READ and READDIR loops as normal control flow.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Status {
    pub code: u32,
    pub message: Bytes,
    pub language: Bytes,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok as u32
    }

    pub fn is_eof(&self) -> bool {
        self.code == StatusCode::Eof as u32
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match StatusCode::try_from(self.code) {
            Ok(code) => write!(f, "{code}")?,
            Err(raw) => write!(f, "status {raw}")?,
        }
        if !self.message.is_empty() {
            write!(f, ": {}", String::from_utf8_lossy(&self.message))?;
        }
        Ok(())
    }
}

impl std::error::Error for Status {}

impl From<Status> for std::io::Error {
    fn from(value: Status) -> Self {
        let kind = match StatusCode::try_from(value.code) {
            Ok(StatusCode::Eof) => std::io::ErrorKind::UnexpectedEof,
            Ok(StatusCode::NoSuchFile) => std::io::ErrorKind::NotFound,
            Ok(StatusCode::PermissionDenied) => std::io::ErrorKind::PermissionDenied,
            Ok(StatusCode::BadMessage) => std::io::ErrorKind::InvalidData,
            Ok(StatusCode::NoConnection) => std::io::ErrorKind::NotConnected,
            Ok(StatusCode::ConnectionLost) => std::io::ErrorKind::ConnectionAborted,
            Ok(StatusCode::OpUnsupported) => std::io::ErrorKind::Unsupported,
            _ => std::io::ErrorKind::Other,
        };
        Self::new(kind, value)
    }
}

impl SftpDecode for Status {
    fn decode(buf: &mut dyn bytes::Buf) -> Result<Self, Error> {
        let code = u32::decode(buf)?;
        let message = Bytes::decode(buf)?;
        let language = Bytes::decode(buf)?;

        Ok(Status {
            code,
            message,
            language,
        })
    }
}

impl SftpEncode for &Status {
    fn encode(self, buf: &mut dyn bytes::BufMut) -> Result<(), Error> {
        self.code.encode(buf)?;
        self.message.encode(buf)?;
        self.language.encode(buf)?;
        Ok(())
    }
}
