use crate::http::parser::ParseError;

/// HTTP request methods the server dispatches on.
///
/// Anything else on the request line is a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file or directory listing
    GET,
    /// POST - Create or overwrite a file
    POST,
    /// PUT - Create or overwrite a file
    PUT,
    /// DELETE - Remove a file or directory tree
    DELETE,
}

/// HTTP version from the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// The parsed head of one request.
///
/// Holds only what the server acts on: the request line, the declared body
/// length, and whether the client asked to close the connection.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// The HTTP method
    pub method: Method,
    /// Raw request target, still percent-encoded (e.g. "/docs/a%20b.txt")
    pub target: String,
    /// HTTP version
    pub version: Version,
    /// Declared body length, 0 when absent. Only POST and PUT act on it,
    /// so an unparsable value is kept here rather than failing the head.
    pub content_length: Result<usize, ParseError>,
    /// Client sent `Connection: close`
    pub wants_close: bool,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive, uppercase)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches a supported method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use bastion::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("HEAD"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        }
    }
}

impl Version {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HTTP/1.0" => Some(Version::Http10),
            "HTTP/1.1" => Some(Version::Http11),
            _ => None,
        }
    }
}

impl RequestHead {
    /// Whether the connection should remain open after the response.
    ///
    /// Keep-alive is assumed unless the client sent `Connection: close`.
    pub fn keep_alive(&self) -> bool {
        !self.wants_close
    }
}
