use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::ServeError;
use crate::files::handlers;
use crate::http::buffer::{read_body, read_header_block, HeaderBlock};
use crate::http::parser::{content_length, parse_request_head, wants_close};
use crate::http::request::{Method, RequestHead};
use crate::http::response::Response;
use crate::http::writer::Reply;
use crate::server::ServeContext;

/// One client connection and everything it remembers between requests.
///
/// The stream is owned here and released when the connection is dropped.
pub struct Connection<S> {
    stream: S,
    ctx: Arc<ServeContext>,
    /// Bytes read past the last consumed request; seeds the next one.
    leftover: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequest,
    Dispatching(HeaderBlock),
    Writing(Reply, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServeContext>) -> Self {
        Self {
            stream,
            ctx,
            leftover: BytesMut::new(),
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// Serves requests until the client asks to close, the peer goes away,
    /// or a write fails. Errors returned here are write failures; the peer
    /// has seen a truncated response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        // Peer may already be gone; nothing left to report.
        let _ = self.stream.shutdown().await;
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => {
                    let seed = std::mem::take(&mut self.leftover);
                    self.state =
                        match read_header_block(&mut self.stream, seed, &self.ctx.limits).await {
                            Ok(block) => ConnectionState::Dispatching(block),
                            Err(ServeError::ConnectionClosed) => {
                                debug!("Peer closed connection");
                                ConnectionState::Closed
                            }
                            Err(e) => {
                                warn!(error = %e, "Rejecting request head");
                                ConnectionState::Writing(error_reply(&e), false)
                            }
                        };
                }

                ConnectionState::Dispatching(block) => {
                    self.state = match self.process(block).await {
                        Some((reply, keep_alive)) => ConnectionState::Writing(reply, keep_alive),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Writing(mut reply, keep_alive) => {
                    reply.set_keep_alive(keep_alive);
                    reply.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        self.state = ConnectionState::AwaitingRequest; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Turns one header block into a reply. `None` means the connection
    /// closed mid-request and nothing should be sent.
    async fn process(&mut self, block: HeaderBlock) -> Option<(Reply, bool)> {
        let close_requested = wants_close(block.head());

        let head = match parse_request_head(block.head()) {
            Ok(head) => head,
            Err(e) => {
                let err = ServeError::from(e);
                warn!(error = %err, "Malformed request");
                let keep_alive = match self.skip_body(block).await {
                    Ok(()) => !close_requested,
                    Err(ServeError::ConnectionClosed) => return None,
                    Err(_) => false,
                };
                return Some((error_reply(&err), keep_alive));
            }
        };

        match self.handle(&head, block).await {
            Ok(reply) => {
                info!(
                    method = ?head.method,
                    path = %head.target,
                    status = reply.status().as_u16(),
                    "Request served"
                );
                Some((reply, head.keep_alive()))
            }
            Err(ServeError::ConnectionClosed) => {
                debug!(
                    method = ?head.method,
                    path = %head.target,
                    "Connection closed before the request body was complete"
                );
                None
            }
            Err(e) => {
                let status = e.status();
                match &e {
                    ServeError::PathRejected { .. } => warn!(
                        method = ?head.method,
                        path = %head.target,
                        status = status.as_u16(),
                        "Path rejected"
                    ),
                    _ => info!(
                        method = ?head.method,
                        path = %head.target,
                        status = status.as_u16(),
                        error = %e,
                        "Request failed"
                    ),
                }
                Some((error_reply(&e), head.keep_alive() && !e.breaks_framing()))
            }
        }
    }

    /// Consumes the request's body (if any), records the leftover bytes,
    /// resolves the target, and runs the method's handler.
    async fn handle(&mut self, head: &RequestHead, mut block: HeaderBlock) -> Result<Reply, ServeError> {
        match head.method {
            Method::GET => {
                self.leftover = block.split_leftover();
                let path = self.ctx.root.resolve(&head.target)?;
                handlers::get(&path).await
            }

            Method::POST | Method::PUT => {
                // The whole body is collected before anything is created or truncated.
                let body_len = head.content_length.clone()?;
                read_body(&mut self.stream, &mut block, body_len, &self.ctx.limits).await?;
                let (body, leftover) = block.split_body(body_len);
                self.leftover = leftover;

                let path = self.ctx.root.resolve_writable(&head.target)?;
                handlers::write(&path, &body).await
            }

            Method::DELETE => {
                self.leftover = block.split_leftover();
                let path = self.ctx.root.resolve_writable(&head.target)?;
                handlers::delete(&path).await
            }
        }
    }

    /// Drops the body declared by a request that will not be served, so the
    /// next pipelined request starts at the right byte. Fails when the body's
    /// extent is unknown or too large to skip.
    async fn skip_body(&mut self, mut block: HeaderBlock) -> Result<(), ServeError> {
        let body_len = content_length(block.head())?;
        read_body(&mut self.stream, &mut block, body_len, &self.ctx.limits).await?;
        self.leftover = block.split_body(body_len).1;
        Ok(())
    }
}

fn error_reply(err: &ServeError) -> Reply {
    Reply::Buffered(Response::error(err.status()))
}
