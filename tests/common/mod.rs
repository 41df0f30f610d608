//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use forward_proxy::config::RelayConfig;
use forward_proxy::net::{ConnectionTracker, Dispatcher};
use forward_proxy::observability::AccessLog;
use forward_proxy::{Relay, Shutdown};

pub const RESPONSE: &[u8] = b"HTTP/1.0 200 OK\r\nContent-Length: 5\r\n\r\nhello\r\n";

/// Origin that records each request head and answers with a fixed response.
pub struct StubOrigin {
    pub addr: SocketAddr,
    pub accepted: Arc<AtomicUsize>,
    pub requests: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl StubOrigin {
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

pub async fn start_stub_origin(response: &'static [u8]) -> StubOrigin {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::unbounded_channel();

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let (rd, mut wr) = socket.into_split();
                        let mut reader = BufReader::new(rd);
                        let mut head = Vec::new();
                        loop {
                            let mut line = Vec::new();
                            match reader.read_until(b'\n', &mut line).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) => {}
                            }
                            let blank = line == b"\r\n";
                            head.extend_from_slice(&line);
                            if blank {
                                break;
                            }
                        }
                        let _ = tx.send(head);
                        let _ = wr.write_all(response).await;
                        let _ = wr.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    StubOrigin {
        addr,
        accepted,
        requests: rx,
    }
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub tracker: ConnectionTracker,
    pub handle: JoinHandle<()>,
}

pub async fn start_proxy(log_path: &Path) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = RelayConfig {
        io_timeout_secs: Some(10),
        ..RelayConfig::default()
    };
    let relay = Relay::new(&config, Arc::new(AccessLog::new(log_path)));
    let dispatcher = Dispatcher::from_listener(listener, relay);
    let addr = dispatcher.local_addr().unwrap();
    let tracker = dispatcher.tracker();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(dispatcher.run(shutdown.subscribe()));

    RunningProxy {
        addr,
        shutdown,
        tracker,
        handle,
    }
}

/// Fresh log path under the temp dir.
pub fn temp_log_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "forward-proxy-it-{}-{}.log",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

/// Send `request` through the proxy and collect everything it sends back.
///
/// A reset counts as end of stream: the proxy may close with part of an
/// unsupported request still unread.
pub async fn exchange(proxy: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut client = TcpStream::connect(proxy).await.unwrap();
    let _ = client.write_all(request).await;
    let mut response = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match client.read(&mut buf).await {
            Ok(0) | Err(_) => return response,
            Ok(n) => response.extend_from_slice(&buf[..n]),
        }
    }
}
