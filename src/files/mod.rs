//! Filesystem side of the server.
//!
//! This module maps request targets onto the document root and carries out
//! what each method asks for.
//!
//! - **`resolve`**: Percent-decoding, canonicalization, and the containment checks
//! - **`handlers`**: GET, POST/PUT, and DELETE against a resolved path
//! - **`listing`**: HTML rendering of directory contents

pub mod handlers;
pub mod listing;
pub mod resolve;

pub use resolve::{DocumentRoot, ResolvedPath};
