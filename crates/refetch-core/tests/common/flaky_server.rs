//! Minimal HTTP/1.1 server for integration tests: fails a configurable
//! number of requests, then serves a fixed body.
//!
//! One response per connection. The failure modes cover what the retry
//! loop must classify in the wild: retryable statuses, fatal statuses and
//! connections dropped before a response is written.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub enum FailureMode {
    /// Respond with the given status and an empty body.
    Status(u16),
    /// Accept the connection, then close it without writing anything.
    Drop,
}

#[derive(Debug, Clone)]
pub struct FlakyServerOptions {
    /// Number of leading requests that fail before the body is served.
    pub failures: u32,
    /// How the failing requests fail.
    pub mode: FailureMode,
    /// Status of the successful response.
    pub success_status: u16,
    /// Content type served with the body.
    pub content_type: &'static str,
}

impl Default for FlakyServerOptions {
    fn default() -> Self {
        Self {
            failures: 0,
            mode: FailureMode::Status(500),
            success_status: 200,
            content_type: "application/json",
        }
    }
}

/// Handle to a running server: base URL plus the request counter.
pub struct FlakyServer {
    pub url: String,
    hits: Arc<AtomicU32>,
}

impl FlakyServer {
    /// Number of requests the server has accepted so far.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body` after the
/// configured failures. Returns the handle; the server runs until the
/// process exits.
pub fn start(body: Vec<u8>, opts: FlakyServerOptions) -> FlakyServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicU32::new(0));
    let body = Arc::new(body);
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hit = counter.fetch_add(1, Ordering::SeqCst);
            handle(stream, &body, &opts, hit);
        }
    });
    FlakyServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &FlakyServerOptions, hit: u32) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    // Read the request head before answering; clients get upset otherwise.
    let mut buf = [0u8; 4096];
    let _ = stream.read(&mut buf);

    if hit < opts.failures {
        match opts.mode {
            FailureMode::Drop => (),
            FailureMode::Status(status) => {
                let response = format!(
                    "HTTP/1.1 {} Service Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = stream.write_all(response.as_bytes());
            }
        }
        return;
    }

    let response = format!(
        "HTTP/1.1 {} OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        opts.success_status,
        opts.content_type,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
