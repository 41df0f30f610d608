//! Full transactions through the proxy.

use std::time::Duration;

use forward_proxy::http::USER_AGENT;

mod common;

use common::{exchange, start_proxy, start_stub_origin, temp_log_path, RESPONSE};

#[tokio::test]
async fn get_is_forwarded_relayed_and_logged() {
    let mut origin = start_stub_origin(RESPONSE).await;
    let log_path = temp_log_path("e2e-get");
    let proxy = start_proxy(&log_path).await;

    let url = format!("http://127.0.0.1:{}/index.html", origin.addr.port());
    let request = format!("GET {url} HTTP/1.1\r\nHost: ignored\r\n\r\n");
    let response = exchange(proxy.addr, request.as_bytes()).await;
    assert_eq!(response, RESPONSE);

    let head = String::from_utf8(origin.requests.recv().await.unwrap()).unwrap();
    assert!(head.starts_with("GET /index.html HTTP/1.0\r\nHost: ignored\r\n"), "{head}");
    assert!(head.contains("\r\nConnection: close\r\n"));
    assert!(head.contains("\r\nProxy-Connection: close\r\n"));
    assert!(head.contains(&format!("\r\nUser-Agent: {USER_AGENT}\r\n")));
    assert!(head.ends_with("\r\n\r\n"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].ends_with(&format!(": 127.0.0.1 {url} {}", RESPONSE.len())),
        "{}",
        lines[0]
    );
    let _ = std::fs::remove_file(log_path);
}

#[tokio::test]
async fn client_headers_are_rewritten() {
    let mut origin = start_stub_origin(RESPONSE).await;
    let log_path = temp_log_path("e2e-headers");
    let proxy = start_proxy(&log_path).await;

    let request = format!(
        "get http://127.0.0.1:{}/a?b=c HTTP/1.1\r\n\
         User-Agent: curl/8.0\r\n\
         Accept: */*\r\n\
         Proxy-Connection: keep-alive\r\n\
         Connection: keep-alive\r\n\
         X-Custom: one\r\n\
         \r\n",
        origin.addr.port()
    );
    exchange(proxy.addr, request.as_bytes()).await;

    let head = String::from_utf8(origin.requests.recv().await.unwrap()).unwrap();
    assert_eq!(
        head,
        format!(
            "GET /a?b=c HTTP/1.0\r\n\
             Host: 127.0.0.1\r\n\
             Connection: close\r\n\
             Proxy-Connection: close\r\n\
             User-Agent: {USER_AGENT}\r\n\
             Accept: */*\r\n\
             X-Custom: one\r\n\
             \r\n"
        )
    );
    let _ = std::fs::remove_file(log_path);
}

#[tokio::test]
async fn transaction_count_returns_to_zero() {
    let origin = start_stub_origin(RESPONSE).await;
    let log_path = temp_log_path("e2e-tracker");
    let proxy = start_proxy(&log_path).await;

    let request = format!("GET http://127.0.0.1:{}/ HTTP/1.0\r\n\r\n", origin.addr.port());
    exchange(proxy.addr, request.as_bytes()).await;

    tokio::time::timeout(Duration::from_secs(5), proxy.tracker.wait_for_drain())
        .await
        .unwrap();
    assert_eq!(origin.accepted(), 1);
    let _ = std::fs::remove_file(log_path);
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let log_path = temp_log_path("e2e-shutdown");
    let proxy = start_proxy(&log_path).await;

    proxy.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), proxy.handle)
        .await
        .unwrap()
        .unwrap();

    assert!(tokio::net::TcpStream::connect(proxy.addr).await.is_err());
}
