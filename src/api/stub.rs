//! One-shot HTTP server for exercising the client against canned responses

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server that answers exactly one request
pub(crate) struct StubServer {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    /// Resolves to the raw request once it has been answered
    pub request: JoinHandle<String>,
}

/// Serve `body` with `status` (e.g. `"200 OK"`) to the first connection
pub(crate) async fn serve_once(status: &'static str, body: &'static str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let request = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut received = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&received) {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        String::from_utf8_lossy(&received).into_owned()
    });

    StubServer { base_url, request }
}

/// Headers read and the whole body present (by length or final chunk)
fn request_complete(received: &[u8]) -> bool {
    let Some(header_end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&received[..header_end]).to_ascii_lowercase();
    let body_len = received.len() - header_end - 4;

    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok());

    match content_length {
        Some(len) => body_len >= len,
        None if headers.contains("transfer-encoding: chunked") => {
            received.ends_with(b"0\r\n\r\n")
        }
        None => true,
    }
}
