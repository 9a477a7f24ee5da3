use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::AsyncWrite;

use crate::error::Error;
use crate::file::File;
use crate::message;

// Largest WRITE issued per poll.
const MAX_CHUNK: usize = 32768;

/// Sequential writer over an open [`File`].
///
/// Writes go out in 32 KiB slices at a running offset. Shutdown
/// flushes the outstanding write and closes the remote handle, after which
/// the wrapped file counts as closed.
pub struct SftpWriter {
    file: File,
    offset: u64,
    request: Option<Pin<Box<dyn Future<Output = std::io::Result<usize>> + Send>>>,
    closing: Option<Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>>,
}

impl SftpWriter {
    pub(crate) fn new(file: File) -> Self {
        Self {
            file,
            offset: 0,
            request: None,
            closing: None,
        }
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl AsyncWrite for SftpWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        if self.request.is_none() && self.file.is_closed() {
            return Poll::Ready(Err(Error::FileHandleInvalid.into()));
        }

        let request = if let Some(request) = &mut self.request {
            request
        } else {
            let client = self.file.client().clone();
            let handle = self.file.handle().clone();
            let offset = self.offset;
            let length = buf.len().min(MAX_CHUNK);
            let data = Bytes::copy_from_slice(&buf[..length]);
            self.request.get_or_insert(Box::pin(async move {
                match client
                    .write(message::Write {
                        handle,
                        offset,
                        data,
                    })
                    .await
                {
                    Ok(()) => Ok(length),
                    Err(err) => Err(err.into()),
                }
            }))
        };

        match request.as_mut().poll(cx) {
            Poll::Ready(Ok(length)) => {
                self.request = None;
                self.offset += length as u64;
                Poll::Ready(Ok(length))
            }
            Poll::Ready(Err(err)) => {
                self.request = None;
                Poll::Ready(Err(err))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_flush(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        let Some(request) = &mut self.request else {
            return Poll::Ready(Ok(()));
        };

        match request.as_mut().poll(cx) {
            Poll::Ready(Ok(length)) => {
                self.request = None;
                self.offset += length as u64;
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(err)) => {
                self.request = None;
                Poll::Ready(Err(err))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.as_mut().poll_flush(cx) {
            Poll::Ready(Ok(())) => {}
            other => return other,
        }

        let closing = if let Some(closing) = &mut self.closing {
            closing
        } else {
            if self.file.is_closed() {
                return Poll::Ready(Ok(()));
            }
            let client = self.file.client().clone();
            let handle = self.file.handle().clone();
            self.file.mark_closed();
            self.closing.get_or_insert(Box::pin(async move {
                client.close(handle).await.map_err(std::io::Error::from)
            }))
        };

        match closing.as_mut().poll(cx) {
            Poll::Ready(result) => {
                self.closing = None;
                Poll::Ready(result)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
