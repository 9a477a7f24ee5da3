//! Scripted raw-byte SFTP server over an in-process duplex pipe.
//!
//! Frames are built and parsed by hand here, independently of the crate's
//! codec, so an encode/decode bug cannot cancel itself out in the tests.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use sftpio::SftpClient;

pub const FXP_INIT: u8 = 1;
pub const FXP_VERSION: u8 = 2;
pub const FXP_OPEN: u8 = 3;
pub const FXP_CLOSE: u8 = 4;
pub const FXP_READ: u8 = 5;
pub const FXP_WRITE: u8 = 6;
pub const FXP_LSTAT: u8 = 7;
pub const FXP_FSTAT: u8 = 8;
pub const FXP_OPENDIR: u8 = 11;
pub const FXP_READDIR: u8 = 12;
pub const FXP_REMOVE: u8 = 13;
pub const FXP_MKDIR: u8 = 14;
pub const FXP_RMDIR: u8 = 15;
pub const FXP_REALPATH: u8 = 16;
pub const FXP_STAT: u8 = 17;
pub const FXP_RENAME: u8 = 18;
pub const FXP_STATUS: u8 = 101;
pub const FXP_HANDLE: u8 = 102;
pub const FXP_DATA: u8 = 103;
pub const FXP_NAME: u8 = 104;
pub const FXP_ATTRS: u8 = 105;

pub const STATUS_OK: u32 = 0;
pub const STATUS_EOF: u32 = 1;
pub const STATUS_PERMISSION_DENIED: u32 = 3;
pub const STATUS_FAILURE: u32 = 4;

/// One deframed packet as seen by the server: type, id, and the body after
/// the id word.
pub struct Frame {
    pub kind: u8,
    pub id: u32,
    pub body: Vec<u8>,
}

pub async fn read_frame(io: &mut DuplexStream) -> Frame {
    let mut length = [0u8; 4];
    io.read_exact(&mut length).await.expect("frame length");
    let length = u32::from_be_bytes(length) as usize;
    assert!(length >= 5, "frame too short for type and id");

    let mut payload = vec![0u8; length];
    io.read_exact(&mut payload).await.expect("frame payload");

    Frame {
        kind: payload[0],
        id: u32::from_be_bytes(payload[1..5].try_into().unwrap()),
        body: payload[5..].to_vec(),
    }
}

pub async fn write_frame(io: &mut DuplexStream, kind: u8, id: u32, body: &[u8]) {
    let mut frame = Vec::with_capacity(9 + body.len());
    frame.extend_from_slice(&((5 + body.len()) as u32).to_be_bytes());
    frame.push(kind);
    frame.extend_from_slice(&id.to_be_bytes());
    frame.extend_from_slice(body);
    io.write_all(&frame).await.expect("frame write");
}

/// Server side of the handshake: expect the literal v3 INIT, answer with a
/// literal v3 VERSION.
pub async fn accept(io: &mut DuplexStream) {
    let mut init = [0u8; 9];
    io.read_exact(&mut init).await.expect("init packet");
    assert_eq!(init, [0x00, 0x00, 0x00, 0x05, 0x01, 0x00, 0x00, 0x00, 0x03]);
    io.write_all(&[0x00, 0x00, 0x00, 0x05, 0x02, 0x00, 0x00, 0x00, 0x03])
        .await
        .expect("version packet");
}

/// A connected client plus the server end of the pipe.
pub async fn connect() -> (SftpClient, DuplexStream) {
    let (client_io, mut server_io) = tokio::io::duplex(1 << 16);
    let (client, ()) = tokio::join!(
        async {
            SftpClient::with_stream(client_io)
                .await
                .expect("handshake failed")
        },
        accept(&mut server_io),
    );
    (client, server_io)
}

pub fn put_str(out: &mut Vec<u8>, value: &[u8]) {
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());
    out.extend_from_slice(value);
}

pub fn read_str(body: &mut &[u8]) -> Vec<u8> {
    let length = read_u32(body) as usize;
    let (value, rest) = body.split_at(length);
    *body = rest;
    value.to_vec()
}

pub fn read_u32(body: &mut &[u8]) -> u32 {
    let (value, rest) = body.split_at(4);
    *body = rest;
    u32::from_be_bytes(value.try_into().unwrap())
}

pub fn read_u64(body: &mut &[u8]) -> u64 {
    let (value, rest) = body.split_at(8);
    *body = rest;
    u64::from_be_bytes(value.try_into().unwrap())
}

pub fn status_body(code: u32, message: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&code.to_be_bytes());
    put_str(&mut body, message.as_bytes());
    put_str(&mut body, b"en");
    body
}

pub fn handle_body(handle: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    put_str(&mut body, handle);
    body
}

pub fn data_body(data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    put_str(&mut body, data);
    body
}

/// An attribute block carrying only a size.
pub fn attrs_size_body(size: u64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&size.to_be_bytes());
    body
}

/// A NAME body with empty attribute blocks.
pub fn name_body(entries: &[(&[u8], &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for (filename, long_name) in entries {
        put_str(&mut body, filename);
        put_str(&mut body, long_name);
        body.extend_from_slice(&0u32.to_be_bytes());
    }
    body
}
