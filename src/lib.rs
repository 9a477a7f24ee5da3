//! Asynchronous SFTP v3 client engine.
//!
//! The crate speaks the file-transfer protocol on top of an already
//! established SSH session: it frames packets over the `sftp` subsystem
//! channel, multiplexes concurrent requests by id, and exposes a typed
//! request/response surface plus [`File`] and [`Dir`] handle facades.
//!
//! It does not implement SSH itself; a [`russh::Channel`] (or any duplex
//! byte stream for testing) is the entry point.

mod client;
mod decode;
mod dir;
mod encode;
mod error;
mod file;
mod message;
mod pending;
mod reader;
mod writer;

pub use client::SftpClient;
pub use dir::Dir;
pub use error::Error;
pub use file::File;
pub use message::*;
pub use reader::SftpReader;
pub use writer::SftpWriter;

pub use russh;
