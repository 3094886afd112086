use bastion::http::response::{Response, ResponseBuilder, StatusCode};
use bastion::http::writer::ResponseWriter;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(StatusCode::PayloadTooLarge.reason_phrase(), "Payload Too Large");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_defaults() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
    assert_eq!(response.header("Content-Length"), Some("13"));
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
}

#[test]
fn test_response_builder_explicit_headers_win() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("Content-Length", "4096")
        .build();

    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.header("Content-Length"), Some("4096"));
    assert!(response.body.is_empty());
}

#[test]
fn test_response_ok_and_errors() {
    let ok = Response::ok("OK");
    assert_eq!(ok.status, StatusCode::Ok);
    assert_eq!(ok.body, b"OK");

    let not_found = Response::error(StatusCode::NotFound);
    assert_eq!(not_found.status, StatusCode::NotFound);
    assert_eq!(not_found.body, b"404 Not Found");

    let forbidden = Response::error(StatusCode::Forbidden);
    assert_eq!(forbidden.body, b"403 Forbidden");
    assert_eq!(forbidden.header("Content-Length"), Some("13"));
}

#[test]
fn test_set_keep_alive() {
    let mut response = Response::ok("OK");
    response.set_keep_alive(true);
    assert_eq!(response.header("Connection"), Some("keep-alive"));
    response.set_keep_alive(false);
    assert_eq!(response.header("Connection"), Some("close"));
}

#[tokio::test]
async fn test_writer_serializes_status_headers_and_body() {
    let mut response = Response::ok("OK");
    response.set_keep_alive(false);

    let mut out: Vec<u8> = Vec::new();
    ResponseWriter::new(&response)
        .write_to_stream(&mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Content-Length: 2\r\n"));
    assert!(text.contains("Content-Type: text/plain\r\n"));
    assert!(text.contains("Connection: close\r\n"));
    assert!(text.ends_with("\r\n\r\nOK"));
}
