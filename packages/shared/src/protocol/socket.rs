//! Framed reading and writing over a stream connection.

use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

use crate::time::{Clock, SystemClock};

use super::{
    ConnectionError, Frame, HEADER_DELIMITER, Header, MAX_HEADER_LEN, MAX_PAYLOAD_LEN,
    ProtocolError, Request, RequestType,
};

/// Open a stream connection and split it into framed halves.
pub async fn connect(
    host: &str,
    port: u16,
) -> Result<(FramedReader<OwnedReadHalf>, FramedWriter<OwnedWriteHalf>), ConnectionError> {
    let stream = TcpStream::connect((host, port)).await?;
    Ok(split(stream))
}

/// Bind a listening socket. Binding failures are returned as-is; callers do not retry.
pub async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}

/// Split an established stream into framed halves.
pub fn split(stream: TcpStream) -> (FramedReader<OwnedReadHalf>, FramedWriter<OwnedWriteHalf>) {
    let (read_half, write_half) = stream.into_split();
    (FramedReader::new(read_half), FramedWriter::new(write_half))
}

/// Reads header-delimited frames from the read half of a connection.
pub struct FramedReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> FramedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Read the next complete frame.
    ///
    /// Blocks until a full header and exactly `content_length` payload bytes
    /// have arrived. A peer that closes mid-frame yields
    /// [`ConnectionError::Closed`]; a declared payload above
    /// [`MAX_PAYLOAD_LEN`] yields [`ProtocolError::PayloadTooLarge`].
    pub async fn read_request(&mut self) -> Result<Request, ProtocolError> {
        let record = self.read_header_record().await?;
        let header = Header::from_bytes(&record)?;
        let contents = self.read_payload(header.content_length).await?;

        tracing::trace!(
            "Read {} frame ({} payload bytes)",
            header.request_type,
            header.content_length
        );
        Ok(Request { header, contents })
    }

    /// Read frames until one of `request_type` arrives, discarding the rest.
    pub async fn wait_for_request(
        &mut self,
        request_type: RequestType,
    ) -> Result<Request, ProtocolError> {
        loop {
            let request = self.read_request().await?;
            if request.request_type() == request_type {
                return Ok(request);
            }
            tracing::debug!(
                "Discarded {} frame while waiting for {}",
                request.request_type(),
                request_type
            );
        }
    }

    /// Read exactly `len` payload bytes. The buffer grows only as bytes arrive.
    async fn read_payload(&mut self, len: usize) -> Result<Vec<u8>, ProtocolError> {
        if len > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge(len));
        }

        let mut contents = Vec::new();
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut contents)
            .await?;
        if contents.len() < len {
            return Err(ConnectionError::Closed.into());
        }
        Ok(contents)
    }

    /// Accumulate bytes up to and including the header delimiter.
    async fn read_header_record(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let mut record = Vec::new();

        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                return Err(ConnectionError::Closed.into());
            }

            let (consumed, complete) = match delimiter_end(&record, available) {
                Some(end) => (end, true),
                None => (available.len(), false),
            };
            record.extend_from_slice(&available[..consumed]);
            self.inner.consume(consumed);

            if record.len() > MAX_HEADER_LEN {
                return Err(ProtocolError::HeaderTooLarge(MAX_HEADER_LEN));
            }
            if complete {
                return Ok(record);
            }
        }
    }
}

/// Offset in `chunk` just past the delimiter, if the delimiter ends in `chunk`.
///
/// The delimiter may straddle the boundary between `record` and `chunk`.
fn delimiter_end(record: &[u8], chunk: &[u8]) -> Option<usize> {
    if record.last() == Some(&HEADER_DELIMITER[0]) && chunk.first() == Some(&HEADER_DELIMITER[1])
    {
        return Some(1);
    }

    chunk
        .windows(HEADER_DELIMITER.len())
        .position(|window| window == HEADER_DELIMITER)
        .map(|start| start + HEADER_DELIMITER.len())
}

/// Writes frames to the write half of a connection.
pub struct FramedWriter<W> {
    inner: W,
    clock: Arc<dyn Clock>,
}

impl<W: AsyncWrite + Unpin> FramedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_clock(inner, Arc::new(SystemClock))
    }

    /// Create a writer stamping headers with the given clock.
    pub fn with_clock(inner: W, clock: Arc<dyn Clock>) -> Self {
        Self { inner, clock }
    }

    /// Serialize `frame` and send header and payload in a single write.
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), ProtocolError> {
        let payload = frame.payload();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge(payload.len()));
        }
        let header = Header::new(
            frame.request_type(),
            frame.nickname().map(str::to_string),
            payload.len(),
            self.clock.now_unix_seconds(),
        );

        let mut bytes = header.to_bytes()?;
        bytes.extend_from_slice(payload);
        self.inner.write_all(&bytes).await?;
        self.inner.flush().await?;

        tracing::trace!("Wrote {} frame ({} bytes)", header.request_type, bytes.len());
        Ok(())
    }

    pub async fn write_message(
        &mut self,
        nickname: Option<&str>,
        text: &str,
    ) -> Result<(), ProtocolError> {
        self.write_frame(&Frame::Message {
            nickname: nickname.map(str::to_string),
            text: text.to_string(),
        })
        .await
    }

    pub async fn write_join(&mut self, nickname: Option<&str>) -> Result<(), ProtocolError> {
        self.write_frame(&Frame::Join {
            nickname: nickname.map(str::to_string),
        })
        .await
    }

    pub async fn write_leave(&mut self, nickname: Option<&str>) -> Result<(), ProtocolError> {
        self.write_frame(&Frame::Leave {
            nickname: nickname.map(str::to_string),
        })
        .await
    }

    pub async fn write_nickname(&mut self, nickname: Option<&str>) -> Result<(), ProtocolError> {
        self.write_frame(&Frame::Nickname {
            nickname: nickname.map(str::to_string),
        })
        .await
    }

    /// Shut down the write direction, signalling EOF to the peer.
    pub async fn shutdown(&mut self) -> Result<(), ConnectionError> {
        self.inner.shutdown().await?;
        Ok(())
    }
}
