use tracing::{debug, warn};

use crate::client::SftpClient;
use crate::error::Error;
use crate::message::{DirEntry, Handle};

/// An open remote directory.
///
/// Listing is chunked: the server hands out batches of entries until it
/// reports `STATUS(EOF)`, which is surfaced as `None` rather than an error.
/// The close discipline matches [`crate::File`]: one CLOSE on the wire,
/// idempotent `close()`, leak warning on drop.
pub struct Dir {
    client: SftpClient,
    handle: Handle,
    closed: bool,
}

impl Dir {
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

    /// The next batch of entries, in server order, or `None` once the
    /// directory is exhausted.
    pub async fn read_dir(&self) -> Result<Option<Vec<DirEntry>>, Error> {
        if self.closed {
            return Err(Error::FileHandleInvalid);
        }
        match self.client.readdir(self.handle.clone()).await {
            Ok(entries) => {
                debug!(count = entries.len(), "read directory batch");
                Ok(Some(entries))
            }
            Err(Error::Status(status)) if status.is_eof() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Drain the directory to the end-of-directory sentinel.
    pub async fn read_all(&self) -> Result<Vec<DirEntry>, Error> {
        let mut entries = Vec::new();
        while let Some(batch) = self.read_dir().await? {
            entries.extend(batch);
        }
        Ok(entries)
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
            debug!("closed directory");
        }
        result
    }
}

impl Drop for Dir {
    fn drop(&mut self) {
        if !self.closed && !self.client.is_closed() {
            warn!("directory dropped without close; the server-side handle leaks");
        }
    }
}
