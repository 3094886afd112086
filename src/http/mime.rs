use std::path::Path;

/// Content type for names without an extension.
pub const DEFAULT_TEXT: &str = "text/plain";

/// Content type for unrecognized extensions.
pub const DEFAULT_BINARY: &str = "application/octet-stream";

/// Content type derived from the extension of `path`.
///
/// ```
/// # use bastion::http::mime::content_type;
/// # use std::path::Path;
/// assert_eq!(content_type(Path::new("/srv/www/index.HTML")), "text/html");
/// assert_eq!(content_type(Path::new("/srv/www/README")), "text/plain");
/// assert_eq!(content_type(Path::new("/srv/www/blob.xyz")), "application/octet-stream");
/// ```
pub fn content_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension() else {
        return DEFAULT_TEXT;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "mov" => "video/quicktime",
        "mp4" => "video/mp4",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        _ => DEFAULT_BINARY,
    }
}
