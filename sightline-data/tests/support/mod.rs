//! Local HTTP stub shared by the Nominatim adapter tests.
//!
//! Each server binds a one-shot listener on localhost that records the raw
//! request head and replies with a canned response.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const SAO_PAULO: &str = r#"{
    "place_id": 1,
    "display_name": "Rua A, 10, Centro, São Paulo, SP, 01000-000, Brasil",
    "address": {
        "road": "Rua A",
        "house_number": "10",
        "neighbourhood": "Centro",
        "postcode": "01000-000",
        "city": "São Paulo",
        "state": "SP"
    }
}"#;

pub struct StubServer {
    pub base_url: String,
    request: oneshot::Receiver<String>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(status_line: &'static str, body: &'static str) -> Self {
        Self::start_with_delay(status_line, body, Duration::ZERO).await
    }

    pub async fn start_with_delay(
        status_line: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local listener");
        let addr = listener.local_addr().expect("listener address");
        let (sender, request) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let raw = read_request_head(&mut socket).await;
            let _ = sender.send(raw);
            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Self {
            base_url: format!("http://{addr}"),
            request,
            handle,
        }
    }

    pub async fn received_request(self) -> String {
        let raw = self.request.await.expect("server should capture a request");
        self.handle.abort();
        raw
    }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buffer.windows(4).any(|window| window == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => buffer.extend_from_slice(chunk.get(..read).unwrap_or_default()),
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
