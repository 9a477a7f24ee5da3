use std::collections::BTreeMap;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use russh::client::Msg;
use russh::Channel;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};
use tracing::{debug, info, trace, warn};

use crate::dir::Dir;
use crate::error::Error;
use crate::file::File;
use crate::message::{self, Message, MessageKind};
use crate::pending::RequestTable;

/// Handshake deadline, measured from the subsystem request.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest accepted frame; sized for bulk DATA and NAME replies.
const MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

pub(crate) enum Command {
    Request(Message, oneshot::Sender<Result<Message, Error>>),
    Stop,
}

/// An SFTP v3 session over an established SSH channel.
///
/// Cloning is cheap and clones share the session; every clone submits
/// requests to the same multiplexer task, which owns the in-flight table
/// and the channel halves. Once the session closes, all clones fail with
/// [`Error::ConnectionClosed`].
#[derive(Clone, Debug)]
pub struct SftpClient {
    commands: mpsc::UnboundedSender<Command>,
}

macro_rules! request {
    ($($(#[$meta:meta])* $name:ident($variant:ident: $request:ty);)*) => {
        $(
            $(#[$meta])*
            pub async fn $name(&self, request: $request) -> Result<(), Error> {
                match self.send(Message::$variant(request)).await? {
                    Message::Status(status) if status.is_ok() => Ok(()),
                    Message::Status(status) => {
                        warn!(code = status.code, %status, "sftp request failed");
                        Err(Error::Status(status))
                    }
                    other => Err(Error::unexpected("Status", other.kind())),
                }
            }
        )*
    };
    ($($(#[$meta:meta])* $name:ident($variant:ident: $request:ty) -> $reply:ident: $output:ty;)*) => {
        $(
            $(#[$meta])*
            pub async fn $name(&self, request: $request) -> Result<$output, Error> {
                match self.send(Message::$variant(request)).await? {
                    Message::$reply(reply) => Ok(reply),
                    Message::Status(status) => {
                        if status.is_eof() {
                            debug!("sftp request ended with eof");
                        } else {
                            warn!(code = status.code, %status, "sftp request failed");
                        }
                        Err(Error::Status(status))
                    }
                    other => Err(Error::unexpected(stringify!($reply), other.kind())),
                }
            }
        )*
    };
}

impl SftpClient {
    /// Request the `sftp` subsystem on `channel` and perform the version
    /// handshake.
    pub async fn new(mut channel: Channel<Msg>) -> Result<Self, Error> {
        channel.request_subsystem(true, "sftp").await?;
        Self::with_stream(channel.into_stream()).await
    }

    /// Run the engine over any duplex byte stream already bound to an SFTP
    /// server.
    pub async fn with_stream<S>(stream: S) -> Result<Self, Error>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::with_stream_ext(stream, BTreeMap::new()).await
    }

    /// Like [`SftpClient::with_stream`], with extension pairs to advertise
    /// in the `INIT` packet.
    pub async fn with_stream_ext<S>(
        stream: S,
        extensions: BTreeMap<Bytes, Bytes>,
    ) -> Result<Self, Error>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let mut frames_in = LengthDelimitedCodec::builder()
            .big_endian()
            .length_field_length(4)
            .max_frame_length(MAX_FRAME_LENGTH)
            .new_read(reader);
        let mut frames_out = LengthDelimitedCodec::builder()
            .big_endian()
            .length_field_length(4)
            .max_frame_length(MAX_FRAME_LENGTH)
            .new_write(writer);

        let handshake = async {
            let init = Message::Init(message::Init {
                version: message::VERSION,
                extensions,
            });
            trace!(kind = ?init.kind(), "sending request");
            frames_out.send(init.encode(0)?).await?;

            let frame = match frames_in.next().await {
                Some(frame) => frame?,
                None => return Err(Error::ConnectionClosed),
            };
            let (_, reply) = Message::decode(frame.freeze())?;
            trace!(kind = ?reply.kind(), "received response");
            match reply {
                Message::Version(version) => Ok(version),
                other => Err(Error::unexpected("Version", other.kind())),
            }
        };
        let version = timeout(HANDSHAKE_TIMEOUT, handshake)
            .await
            .map_err(|_| Error::MissingResponse)??;

        if version.version < message::VERSION {
            return Err(Error::UnsupportedVersion(version.version));
        }
        info!(version = version.version, "sftp session ready");

        let (commands, queue) = mpsc::unbounded_channel();
        tokio::spawn(run(frames_in, frames_out, queue));

        Ok(Self { commands })
    }

    /// Send a raw message and await the reply correlated by request id.
    ///
    /// The reply may be any packet the server chose to send; the typed
    /// operations below validate its shape.
    pub async fn send(&self, message: Message) -> Result<Message, Error> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Request(message, reply))
            .map_err(|_| Error::ConnectionClosed)?;
        response.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Shut the session down and fail everything still pending.
    ///
    /// Idempotent; returns once the multiplexer task is gone.
    pub async fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
        self.commands.closed().await;
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    request! {
        close(Close: message::Close);
        write(Write: message::Write);
        setstat(SetStat: message::SetStat);
        fsetstat(FSetStat: message::FSetStat);
        remove(Remove: message::Remove);
        mkdir(MkDir: message::MkDir);
        rmdir(RmDir: message::RmDir);
        rename(Rename: message::Rename);
        symlink(Symlink: message::Symlink);
    }

    request! {
        open(Open: message::Open) -> Handle: message::Handle;
        read(Read: message::Read) -> Data: message::Data;
        /// Attributes of the file a path points at, following symlinks.
        stat(Stat: message::Stat) -> Attrs: message::FileAttrs;
        /// Attributes of the path itself; a symlink is not followed.
        lstat(LStat: message::LStat) -> Attrs: message::FileAttrs;
        fstat(FStat: message::FStat) -> Attrs: message::FileAttrs;
        opendir(OpenDir: message::OpenDir) -> Handle: message::Handle;
        readdir(ReadDir: message::ReadDir) -> Name: message::Name;
        realpath(RealPath: message::RealPath) -> Name: message::Name;
        readlink(ReadLink: message::ReadLink) -> Name: message::Name;
        extended(Extended: message::Extended) -> ExtendedReply: message::ExtendedReply;
    }

    /// Open a remote file and wrap the returned handle in a [`File`].
    pub async fn open_file(
        &self,
        filename: impl Into<message::Path>,
        pflags: u32,
        attrs: message::FileAttrs,
    ) -> Result<File, Error> {
        let filename = filename.into();
        let handle = self
            .open(message::Open {
                filename: filename.clone(),
                pflags,
                attrs,
            })
            .await?;
        debug!(file = %filename, "opened file");
        Ok(File::new(self.clone(), handle))
    }

    /// Open a remote directory and wrap the returned handle in a [`Dir`].
    pub async fn open_dir(&self, path: impl Into<message::Path>) -> Result<Dir, Error> {
        let path = path.into();
        let handle = self.opendir(path.clone()).await?;
        debug!(dir = %path, "opened directory");
        Ok(Dir::new(self.clone(), handle))
    }

    /// Canonical absolute form of `path` (REALPATH).
    pub async fn canonicalize(
        &self,
        path: impl Into<message::Path>,
    ) -> Result<message::Path, Error> {
        let mut entries = self.realpath(path.into()).await?;
        if entries.is_empty() {
            return Err(Error::unexpected(
                "Name with at least one entry",
                MessageKind::Name,
            ));
        }
        Ok(entries.remove(0).filename)
    }

    /// Target of the symlink at `path` (READLINK).
    pub async fn read_link(
        &self,
        path: impl Into<message::Path>,
    ) -> Result<message::Path, Error> {
        let mut entries = self.readlink(path.into()).await?;
        if entries.is_empty() {
            return Err(Error::unexpected(
                "Name with at least one entry",
                MessageKind::Name,
            ));
        }
        Ok(entries.remove(0).filename)
    }

    /// List a whole directory: open, drain every batch, close.
    ///
    /// Entries keep the server's order. If the listing fails, the handle is
    /// still closed; the listing error wins and a close failure is only
    /// logged.
    pub async fn read_dir(
        &self,
        path: impl Into<message::Path>,
    ) -> Result<Vec<message::DirEntry>, Error> {
        let path = path.into();
        let mut dir = self.open_dir(path.clone()).await?;

        let mut entries = Vec::new();
        let listing = loop {
            match dir.read_dir().await {
                Ok(Some(batch)) => entries.extend(batch),
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        if let Err(err) = dir.close().await {
            match &listing {
                Ok(()) => return Err(err),
                Err(_) => warn!(error = %err, "failed to close directory after listing error"),
            }
        }
        listing?;

        debug!(dir = %path, count = entries.len(), "read directory");
        Ok(entries)
    }
}

/// The multiplexer task: single owner of the in-flight table and both
/// channel halves.
///
/// Requests and responses interleave freely; correlation is by id only.
/// Any exit path sweeps the table so no waiter is left pending.
async fn run<S>(
    mut frames_in: FramedRead<ReadHalf<S>, LengthDelimitedCodec>,
    mut frames_out: FramedWrite<WriteHalf<S>, LengthDelimitedCodec>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let mut table = RequestTable::new();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Request(message, reply)) => {
                    let id = table.allocate_id();
                    let frame = match message.encode(id) {
                        Ok(frame) => frame,
                        Err(err) => {
                            let _ = reply.send(Err(err));
                            continue;
                        }
                    };
                    trace!(id, kind = ?message.kind(), "sending request");
                    table.submit(id, reply);
                    if let Err(err) = frames_out.send(frame).await {
                        warn!(error = %err, "sftp channel write failed");
                        table.fail(id, Error::ConnectionClosed);
                        break;
                    }
                }
                Some(Command::Stop) | None => {
                    debug!("sftp client stopping");
                    break;
                }
            },
            frame = frames_in.next() => match frame {
                Some(Ok(frame)) => match Message::decode(frame.freeze()) {
                    Ok((id, message)) => {
                        trace!(id, kind = ?message.kind(), "received response");
                        match table.route(id) {
                            Some(slot) => {
                                let _ = slot.send(Ok(message));
                            }
                            None => warn!(id, "dropping response with no matching request"),
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to decode server packet");
                        break;
                    }
                },
                Some(Err(err)) => {
                    warn!(error = %err, "sftp channel read failed");
                    break;
                }
                None => {
                    debug!("sftp channel reached eof");
                    break;
                }
            },
        }
    }

    // No waiter survives the session: sweep the table, then fail commands
    // that were queued but never picked up.
    table.close(|| Error::ConnectionClosed);
    commands.close();
    while let Ok(command) = commands.try_recv() {
        if let Command::Request(_, reply) = command {
            let _ = reply.send(Err(Error::ConnectionClosed));
        }
    }
    let _ = frames_out.close().await;
    info!("sftp session closed");
}
