#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use billsort::{error::ExtractionFailure, utils::pdf::TextExtractor};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::Mutex,
};

/// Treats the file bytes as text, form feeds as page breaks. `CORRUPT` makes
/// extraction fail and `CRASH` makes it panic.
pub struct TextAsPdf;

impl TextExtractor for TextAsPdf {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionFailure> {
        let text = String::from_utf8_lossy(bytes);
        if text.contains("CORRUPT") {
            return Err(ExtractionFailure::new("broken xref table"));
        }
        if text.contains("CRASH") {
            panic!("parser crashed");
        }
        Ok(text.split('\u{000C}').map(str::to_string).collect())
    }
}

pub fn extractor() -> Arc<dyn TextExtractor> {
    Arc::new(TextAsPdf)
}

pub fn write_bill(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write bill fixture");
    path
}

/// Minimal HTTP endpoint that records raw requests and answers every one the same way.
pub struct StubBackend {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    pub async fn start(status_line: &'static str, body: &'static str) -> Self {
        Self::start_raw(format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        ))
        .await
    }

    /// Answers with `response` verbatim, so tests can send broken replies.
    pub async fn start_raw(response: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let response = Arc::new(response);

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let seen = Arc::clone(&seen);
                let response = Arc::clone(&response);
                tokio::spawn(async move {
                    let raw = read_request(&mut sock).await;
                    seen.lock().await.push(raw);
                    let _ = sock.write_all(response.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        Self { base_url: format!("http://{}/api", addr), requests }
    }

    pub async fn recorded(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_request(sock: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = sock.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = find(&buf, b"\r\n\r\n") else { continue };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        match length {
            Some(len) if buf.len() >= end + 4 + len => break,
            Some(_) => {}
            None if buf.ends_with(b"0\r\n\r\n") => break,
            None => {}
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
