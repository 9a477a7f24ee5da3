use bytes::Bytes;
use tracing::{debug, warn};

use crate::client::SftpClient;
use crate::error::Error;
use crate::message::{self, FileAttrs, Handle};
use crate::reader::SftpReader;
use crate::writer::SftpWriter;

/// An open remote file.
///
/// The facade owns its server handle exclusively: the handle is surrendered
/// by exactly one `CLOSE` packet, further [`File::close`] calls are no-ops,
/// and dropping an unclosed file logs a leak warning (the server-side handle
/// cannot be released from `Drop`).
#[derive(Debug)]
pub struct File {
    client: SftpClient,
    handle: Handle,
    closed: bool,
}

impl File {
    pub(crate) fn new(client: SftpClient, handle: Handle) -> Self {
        Self {
            client,
            handle,
            closed: false,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn client(&self) -> &SftpClient {
        &self.client
    }

    /// Mark the handle surrendered without sending CLOSE; the caller has
    /// taken over the wire-level close.
    pub(crate) fn mark_closed(&mut self) {
        self.closed = true;
    }

    fn guard(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::FileHandleInvalid)
        } else {
            Ok(())
        }
    }

    /// Read up to `length` bytes at `offset`.
    ///
    /// The server may return fewer bytes than requested; `None` means end
    /// of file.
    pub async fn read_at(&self, offset: u64, length: u32) -> Result<Option<Bytes>, Error> {
        self.guard()?;
        let request = message::Read {
            handle: self.handle.clone(),
            offset,
            length,
        };
        match self.client.read(request).await {
            Ok(data) => Ok(Some(data.0)),
            Err(Error::Status(status)) if status.is_eof() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn write_at(&self, offset: u64, data: Bytes) -> Result<(), Error> {
        self.guard()?;
        self.client
            .write(message::Write {
                handle: self.handle.clone(),
                offset,
                data,
            })
            .await
    }

    /// Attributes of the open file (FSTAT).
    pub async fn stat(&self) -> Result<FileAttrs, Error> {
        self.guard()?;
        self.client.fstat(self.handle.clone()).await
    }

    /// Change attributes of the open file (FSETSTAT).
    pub async fn set_stat(&self, attrs: FileAttrs) -> Result<(), Error> {
        self.guard()?;
        self.client
            .fsetstat(message::FSetStat {
                handle: self.handle.clone(),
                attrs,
            })
            .await
    }

    /// Surrender the handle. Safe to call more than once; only the first
    /// call reaches the wire.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.client.close(self.handle.clone()).await;
        if result.is_ok() {
            debug!("closed file");
        }
        result
    }

    /// Sequential [`tokio::io::AsyncRead`] adapter starting at offset 0.
    pub fn into_reader(self) -> SftpReader {
        SftpReader::new(self)
    }

    /// Sequential [`tokio::io::AsyncWrite`] adapter starting at offset 0.
    pub fn into_writer(self) -> SftpWriter {
        SftpWriter::new(self)
    }
}

impl Drop for File {
    fn drop(&mut self) {
        if !self.closed && !self.client.is_closed() {
            warn!("file dropped without close; the server-side handle leaks");
        }
    }
}
