#![allow(dead_code)]

use bastion::config::{FilesConfig, Limits};
use bastion::http::connection::Connection;
use bastion::server::ServeContext;
use bastion::files::DocumentRoot;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const HELLO: &str = "Hello, bastion!\n";

/// A document root with a few files and an empty `uploads` directory.
pub fn context_with(limits: Limits) -> (TempDir, Arc<ServeContext>) {
    let tmp = tempfile::tempdir().unwrap();
    let www = tmp.path().join("www");
    fs::create_dir_all(www.join("docs")).unwrap();
    fs::write(www.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(www.join("hello.txt"), HELLO).unwrap();
    fs::write(www.join("docs/readme.md"), "# readme").unwrap();

    let files = FilesConfig {
        root: www,
        ..FilesConfig::default()
    };
    let ctx = ServeContext {
        root: DocumentRoot::open(&files).unwrap(),
        limits,
    };
    (tmp, Arc::new(ctx))
}

pub fn context() -> (TempDir, Arc<ServeContext>) {
    context_with(Limits::default())
}

/// Sends `input` in one write, half-closes, and returns everything the
/// connection wrote back before it ended.
pub async fn exchange(ctx: Arc<ServeContext>, input: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(1 << 20);
    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, ctx);
        conn.run().await
    });

    client.write_all(input).await.unwrap();
    let _ = client.shutdown().await;

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

#[derive(Debug)]
pub struct Parsed {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Parsed {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Splits a byte stream into consecutive responses using their Content-Length.
pub fn parse_responses(mut raw: &[u8]) -> Vec<Parsed> {
    let mut out = Vec::new();
    while !raw.is_empty() {
        let end = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("incomplete response head")
            + 4;
        let head = std::str::from_utf8(&raw[..end]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap();
        assert!(status_line.starts_with("HTTP/1.1 "), "bad status line {:?}", status_line);
        let status: u16 = status_line.split(' ').nth(1).unwrap().parse().unwrap();

        let headers: Vec<(String, String)> = lines
            .filter(|l| !l.is_empty())
            .map(|l| {
                let (k, v) = l.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();
        let len: usize = headers
            .iter()
            .find(|(k, _)| k == "Content-Length")
            .expect("missing Content-Length")
            .1
            .parse()
            .unwrap();

        assert!(raw.len() >= end + len, "truncated body");
        out.push(Parsed {
            status,
            headers,
            body: raw[end..end + len].to_vec(),
        });
        raw = &raw[end + len..];
    }
    out
}
