use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, ReadBuf};

use crate::error::Error;
use crate::file::File;
use crate::message;

// Largest READ issued per poll.
const MAX_CHUNK: usize = 32768;

/// Sequential reader over an open [`File`].
///
/// Each poll issues at most one READ of 32 KiB at the current offset;
/// `STATUS(EOF)` ends the stream. The wrapped file is returned by
/// [`SftpReader::into_inner`] and still has to be closed.
pub struct SftpReader {
    file: File,
    offset: u64,
    eof: bool,
    request: Option<Pin<Box<dyn Future<Output = std::io::Result<Bytes>> + Send>>>,
}

impl SftpReader {
    pub(crate) fn new(file: File) -> Self {
        Self {
            file,
            offset: 0,
            eof: false,
            request: None,
        }
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl AsyncRead for SftpReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.eof {
            return Poll::Ready(Ok(()));
        }
        if self.request.is_none() && self.file.is_closed() {
            return Poll::Ready(Err(Error::FileHandleInvalid.into()));
        }

        let request = if let Some(request) = &mut self.request {
            request
        } else {
            let client = self.file.client().clone();
            let handle = self.file.handle().clone();
            let offset = self.offset;
            let length = buf.remaining().min(MAX_CHUNK) as u32;
            self.request.get_or_insert(Box::pin(async move {
                match client
                    .read(message::Read {
                        handle,
                        offset,
                        length,
                    })
                    .await
                {
                    Ok(data) => Ok(data.0),
                    Err(Error::Status(status)) if status.is_eof() => Ok(Bytes::new()),
                    Err(err) => Err(err.into()),
                }
            }))
        };

        match request.as_mut().poll(cx) {
            Poll::Ready(Ok(data)) => {
                self.request = None;
                if data.is_empty() {
                    self.eof = true;
                } else {
                    buf.put_slice(&data);
                    self.offset += data.len() as u64;
                }
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(err)) => {
                self.request = None;
                Poll::Ready(Err(err))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
