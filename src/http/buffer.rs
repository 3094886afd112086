//! Byte-stream accumulation for one connection.
//!
//! A request's bytes arrive in arbitrary pieces. [`read_header_block`] grows
//! a buffer (seeded with bytes left over from the previous request) until
//! the blank line ending the header block is present, and [`read_body`]
//! keeps growing the same buffer until a declared body is complete. Whatever
//! lies past the consumed request is handed back with [`HeaderBlock::split_leftover`]
//! and becomes the next request's seed.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::Limits;
use crate::error::ServeError;
use crate::http::parser::find_headers_end;

/// Size of a single socket read.
pub const READ_CHUNK: usize = 4096;

/// A buffer holding at least one complete header block.
#[derive(Debug)]
pub struct HeaderBlock {
    buf: BytesMut,
    header_end: usize,
}

impl HeaderBlock {
    /// Header bytes, including the terminating blank line.
    pub fn head(&self) -> &[u8] {
        &self.buf[..self.header_end]
    }

    /// Bytes buffered past the header block so far.
    pub fn buffered_body(&self) -> usize {
        self.buf.len() - self.header_end
    }

    /// Splits off the `body_len` bytes following the header block and
    /// returns them with the remaining (pipelined) bytes.
    ///
    /// The caller must have made sure `body_len` bytes are buffered.
    pub fn split_body(mut self, body_len: usize) -> (Bytes, BytesMut) {
        let consumed = (self.header_end + body_len).min(self.buf.len());
        let leftover = self.buf.split_off(consumed);
        let body = self.buf.split_off(self.header_end).freeze();
        (body, leftover)
    }

    /// Everything past the header block, for requests without a body.
    pub fn split_leftover(self) -> BytesMut {
        self.split_body(0).1
    }
}

/// Accumulates bytes from `source` until a full header block is buffered.
///
/// `seed` is checked first, so a pipelined request that arrived together
/// with the previous one is returned without touching the socket.
/// A read returning zero or failing yields [`ServeError::ConnectionClosed`].
pub async fn read_header_block<R>(
    source: &mut R,
    seed: BytesMut,
    limits: &Limits,
) -> Result<HeaderBlock, ServeError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = seed;
    let mut scanned = 0;

    loop {
        if let Some(header_end) = find_headers_end(&buf, scanned) {
            if header_end > limits.max_header_bytes {
                return Err(ServeError::HeaderTooLarge {
                    limit: limits.max_header_bytes,
                });
            }
            return Ok(HeaderBlock { buf, header_end });
        }

        if buf.len() > limits.max_header_bytes {
            return Err(ServeError::HeaderTooLarge {
                limit: limits.max_header_bytes,
            });
        }

        // The terminator may straddle two reads.
        scanned = buf.len().saturating_sub(3);
        read_chunk(source, &mut buf).await?;
    }
}

/// Reads from `source` until `body_len` bytes follow the header block.
///
/// Short of that, a closed connection is an error: the caller must not act
/// on a partial body.
pub async fn read_body<R>(
    source: &mut R,
    block: &mut HeaderBlock,
    body_len: usize,
    limits: &Limits,
) -> Result<(), ServeError>
where
    R: AsyncRead + Unpin,
{
    if body_len > limits.max_body_bytes {
        return Err(ServeError::BodyTooLarge {
            declared: body_len,
            limit: limits.max_body_bytes,
        });
    }

    while block.buffered_body() < body_len {
        read_chunk(source, &mut block.buf).await?;
    }
    Ok(())
}

async fn read_chunk<R>(source: &mut R, buf: &mut BytesMut) -> Result<(), ServeError>
where
    R: AsyncRead + Unpin,
{
    let mut temp = [0u8; READ_CHUNK];
    let n = source
        .read(&mut temp)
        .await
        .map_err(|_| ServeError::ConnectionClosed)?;

    if n == 0 {
        return Err(ServeError::ConnectionClosed);
    }

    buf.extend_from_slice(&temp[..n]);
    Ok(())
}
