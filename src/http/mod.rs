//! HTTP/1.x protocol handling.
//!
//! This module implements the per-connection request pipeline: persistent
//! connections, pipelined requests, and method-specific body handling.
//!
//! # Architecture
//!
//! - **`connection`**: The connection loop implementing the request-response state machine
//! - **`buffer`**: Accumulates socket reads into header blocks and bodies, carrying leftover bytes forward
//! - **`parser`**: Parses the request line and the two header fields the server reads
//! - **`request`**: Request method, version, and parsed head
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Accumulate a header block (seeded with leftover bytes)
//!        └──────┬───────────┘
//!               │ Header block complete
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Parse, read body, resolve path, run handler
//!        └──────┬───────────┘
//!               │ Reply ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → AwaitingRequest (same connection)
//!               └─ Close → Closed
//! ```
//!
//! A peer closing the socket moves any state straight to `Closed`.

pub mod buffer;
pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
