//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use runtime_guard::clock::ManualClock;
use runtime_guard::notifications::NotifyError;
use runtime_guard::{Guard, GuardConfig, Notifier, Severity};

/// Start time shared by tests driving a manual clock.
#[allow(dead_code)]
pub const EPOCH_MS: u64 = 1_700_000_000_000;

/// Notifier that keeps everything it is asked to show.
#[derive(Debug, Default, Clone)]
pub struct Recorder(Arc<Mutex<Vec<(String, Severity)>>>);

#[allow(dead_code)]
impl Recorder {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Notifier for Recorder {
    fn notify(&self, message: &str, severity: Severity) -> Result<(), NotifyError> {
        self.0.lock().unwrap().push((message.to_string(), severity));
        Ok(())
    }
}

/// Guard on a manual clock with a recording notifier.
#[allow(dead_code)]
pub fn manual_guard(config: GuardConfig) -> (Guard, ManualClock, Recorder) {
    let clock = ManualClock::at_millis(EPOCH_MS);
    let recorder = Recorder::default();
    let guard = Guard::builder(config)
        .clock(Arc::new(clock.clone()))
        .notifier(Box::new(recorder.clone()))
        .build();
    (guard, clock, recorder)
}

/// Bind an ephemeral local port.
#[allow(dead_code)]
pub async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Start a simple mock backend that returns a fixed response.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (200, response.to_string()) }).await
}

/// Start a mock backend whose status and body come from `f` per request.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let (listener, addr) = bind_local().await;
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let (listener, addr) = bind_local().await;
    drop(listener);
    addr
}
