//! One handler per method, each acting on an already-contained path.

use tokio::fs::{self, File};

use crate::error::ServeError;
use crate::files::listing::list_directory;
use crate::files::resolve::{Read, ResolvedPath, Write};
use crate::http::mime;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::Reply;

/// Acknowledgment body for successful writes and deletes.
const ACK: &[u8] = b"OK";

/// GET: a directory listing for directories, the file's bytes otherwise.
///
/// The Content-Length sent is the file size observed at open time.
pub async fn get(path: &ResolvedPath<Read>) -> Result<Reply, ServeError> {
    let target = path.as_path();
    let metadata = fs::metadata(target)
        .await
        .map_err(|e| ServeError::unavailable(target, e))?;

    if metadata.is_dir() {
        let listing = list_directory(path)
            .await
            .map_err(|e| ServeError::unavailable(target, e))?;
        let response = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html")
            .body(listing.into_bytes())
            .build();
        return Ok(Reply::Buffered(response));
    }

    if !metadata.is_file() {
        return Err(ServeError::unavailable(
            target,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let file = File::open(target)
        .await
        .map_err(|e| ServeError::unavailable(target, e))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| ServeError::unavailable(target, e))?
        .len();

    let head = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", mime::content_type(target))
        .header("Content-Length", len.to_string())
        .build();

    Ok(Reply::File { head, file, len })
}

/// POST and PUT: create or truncate the file and write `body` to it,
/// creating missing parent directories.
///
/// Only called once the whole body has been received.
pub async fn write(path: &ResolvedPath<Write>, body: &[u8]) -> Result<Reply, ServeError> {
    let target = path.as_path();

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ServeError::unavailable(parent, e))?;
    }
    fs::write(target, body)
        .await
        .map_err(|e| ServeError::unavailable(target, e))?;

    Ok(Reply::Buffered(Response::ok(ACK)))
}

/// DELETE: remove a file, or a directory with everything under it.
pub async fn delete(path: &ResolvedPath<Write>) -> Result<Reply, ServeError> {
    let target = path.as_path();
    let metadata = fs::symlink_metadata(target)
        .await
        .map_err(|e| ServeError::unavailable(target, e))?;

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(target).await
    } else {
        fs::remove_file(target).await
    };
    removed.map_err(|e| ServeError::unavailable(target, e))?;

    Ok(Reply::Buffered(Response::ok(ACK)))
}
