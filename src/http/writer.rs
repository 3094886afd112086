use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Block size for streaming file bodies.
pub const FILE_CHUNK: usize = 64 * 1024;

fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

/// What a handler hands back to the connection loop.
#[derive(Debug)]
pub enum Reply {
    /// A response held fully in memory.
    Buffered(Response),
    /// A response head followed by `len` bytes streamed from `file`.
    File {
        head: Response,
        file: File,
        len: u64,
    },
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Buffered(resp) => resp.status,
            Reply::File { head, .. } => head.status,
        }
    }

    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        match self {
            Reply::Buffered(resp) => resp.set_keep_alive(keep_alive),
            Reply::File { head, .. } => head.set_keep_alive(keep_alive),
        }
    }

    /// Writes the reply to `stream`. Any error leaves the peer with a
    /// truncated response, so the connection must be dropped.
    pub async fn write_to_stream<W>(self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            Reply::Buffered(resp) => ResponseWriter::new(&resp).write_to_stream(stream).await,
            Reply::File {
                head,
                mut file,
                len,
            } => {
                ResponseWriter::new(&head).write_to_stream(stream).await?;
                send_file(&mut file, len, stream).await
            }
        }
    }
}

/// Copies exactly `len` bytes from `file` to `stream` in [`FILE_CHUNK`] blocks.
///
/// Fails if the file ends early, since the advertised Content-Length can
/// then no longer be honored.
pub async fn send_file<R, W>(file: &mut R, len: u64, stream: &mut W) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = vec![0u8; FILE_CHUNK];
    let mut remaining = len;

    while remaining > 0 {
        let want = remaining.min(FILE_CHUNK as u64) as usize;
        let n = file.read(&mut chunk[..want]).await?;
        if n == 0 {
            anyhow::bail!("file ended {} bytes short of its advertised length", remaining);
        }
        stream.write_all(&chunk[..n]).await?;
        remaining -= n as u64;
    }

    stream.flush().await?;
    Ok(())
}
