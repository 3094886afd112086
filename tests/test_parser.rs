use bastion::http::parser::{
    content_length, find_headers_end, parse_request_head, wants_close, ParseError,
};
use bastion::http::request::{Method, Version};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let head = parse_request_head(req).unwrap();

    assert_eq!(head.method, Method::GET);
    assert_eq!(head.target, "/");
    assert_eq!(head.version, Version::Http11);
    assert_eq!(head.content_length, Ok(0));
    assert!(!head.wants_close);
    assert!(head.keep_alive());
}

#[test]
fn test_parse_http_10_request() {
    let head = parse_request_head(b"GET /a.txt HTTP/1.0\r\n\r\n").unwrap();
    assert_eq!(head.version, Version::Http10);
    // Keep-alive unless the client says otherwise.
    assert!(head.keep_alive());
}

#[test]
fn test_parse_target_stays_percent_encoded() {
    let head = parse_request_head(b"GET /a%20b/%2e%2e HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(head.target, "/a%20b/%2e%2e");
}

#[test]
fn test_parse_all_supported_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} /x HTTP/1.1\r\n\r\n", method_str);
        let head = parse_request_head(req.as_bytes()).unwrap();
        assert_eq!(head.method, expected_method);
    }
}

#[test]
fn test_parse_rejects_unsupported_and_lowercase_methods() {
    for req in [
        &b"HEAD / HTTP/1.1\r\n\r\n"[..],
        b"PATCH / HTTP/1.1\r\n\r\n",
        b"get / HTTP/1.1\r\n\r\n",
    ] {
        assert_eq!(parse_request_head(req).unwrap_err(), ParseError::InvalidMethod);
    }
}

#[test]
fn test_parse_rejects_bad_versions() {
    for req in [
        &b"GET / HTTP/2.0\r\n\r\n"[..],
        b"GET / HTTP/1.2\r\n\r\n",
        b"GET / http/1.1\r\n\r\n",
        b"GET / HTTP/1.1 extra\r\n\r\n",
    ] {
        assert_eq!(parse_request_head(req).unwrap_err(), ParseError::InvalidVersion);
    }
}

#[test]
fn test_parse_rejects_short_request_lines() {
    assert_eq!(
        parse_request_head(b"GET /\r\n\r\n").unwrap_err(),
        ParseError::InvalidRequest
    );
    assert_eq!(
        parse_request_head(b"\r\n\r\n").unwrap_err(),
        ParseError::InvalidRequest
    );
    assert_eq!(
        parse_request_head(b"GET /\xff HTTP/1.1\r\n\r\n").unwrap_err(),
        ParseError::InvalidRequest
    );
}

#[test]
fn test_parse_empty_target_is_allowed() {
    let head = parse_request_head(b"GET  HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(head.target, "");
}

#[test]
fn test_content_length_is_case_insensitive_first_match() {
    let block = b"PUT /u HTTP/1.1\r\ncontent-LENGTH: 5\r\nContent-Length: 9\r\n\r\n";
    assert_eq!(content_length(block), Ok(5));

    let head = parse_request_head(block).unwrap();
    assert_eq!(head.content_length, Ok(5));
}

#[test]
fn test_content_length_defaults_to_zero() {
    assert_eq!(content_length(b"POST /u HTTP/1.1\r\nHost: x\r\n\r\n"), Ok(0));
}

#[test]
fn test_invalid_content_length() {
    let block = b"POST /u HTTP/1.1\r\nContent-Length: ten\r\n\r\n";
    let head = parse_request_head(block).unwrap();
    assert_eq!(head.method, Method::POST);
    assert_eq!(head.content_length, Err(ParseError::InvalidContentLength));
    assert_eq!(
        content_length(b"POST /u HTTP/1.1\r\nContent-Length: -1\r\n\r\n"),
        Err(ParseError::InvalidContentLength)
    );
}

#[test]
fn test_connection_close_detection() {
    assert!(wants_close(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n"));
    assert!(wants_close(b"GET / HTTP/1.1\r\nconnection: CLOSE\r\n\r\n"));
    assert!(wants_close(b"GET / HTTP/1.1\r\nConnection: foo, close\r\n\r\n"));
    assert!(!wants_close(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n"));
    assert!(!wants_close(b"GET / HTTP/1.1\r\nX-Note: Connection: close\r\n\r\n"));
    assert!(!wants_close(b"GET / HTTP/1.1\r\n\r\n"));
}

#[test]
fn test_connection_close_detected_on_malformed_request_line() {
    let block = b"BREW /pot HTTP/1.1\r\nConnection: close\r\n\r\n";
    assert!(parse_request_head(block).is_err());
    assert!(wants_close(block));
}

#[test]
fn test_headers_after_blank_line_are_ignored() {
    let buf = b"GET / HTTP/1.1\r\n\r\nConnection: close\r\n\r\n";
    let end = find_headers_end(buf, 0).unwrap();
    assert!(!wants_close(&buf[..end]));
    assert!(!parse_request_head(buf).unwrap().wants_close);
}

#[test]
fn test_malformed_header_lines_are_ignored() {
    let head = parse_request_head(b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n").unwrap();
    assert_eq!(head.target, "/");
}

#[test]
fn test_find_headers_end_incomplete() {
    assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\nHost: x\r\n", 0), None);
    assert_eq!(find_headers_end(b"", 0), None);
}
