//! Minimal HTTP/1.1 responder standing in for a Hydra instance.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
}

pub struct StubHydra {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubHydra {
    /// Serves `routes` as `(path, status, body)`. Unknown paths get a 404.
    pub async fn start(routes: &[(&str, u16, &str)]) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let routes: Arc<BTreeMap<String, Route>> = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| {
                    (
                        (*path).to_string(),
                        Route {
                            status: *status,
                            body: (*body).to_string(),
                        },
                    )
                })
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(respond(stream, routes.clone(), recorded.clone()));
            }
        });

        Ok(Self {
            port,
            requests,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(
    mut stream: TcpStream,
    routes: Arc<BTreeMap<String, Route>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let mut buf = vec![0u8; 4096];
    let mut raw = Vec::new();
    loop {
        let Ok(n) = stream.read(&mut buf).await else {
            return;
        };
        if n == 0 {
            return;
        }
        raw.extend_from_slice(&buf[..n]);
        if raw.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&raw).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let route = routes.get(&path).cloned().unwrap_or(Route {
        status: 404,
        body: r#"{"error":"not found"}"#.to_string(),
    });
    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
    });

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
