//! Bastion - static file server with a confined writable area
//!
//! Serves files from a document root over HTTP/1.x with keep-alive and
//! pipelining, and accepts POST/PUT/DELETE beneath one writable sub-directory.

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod server;
