use m2x_client::{Client, ClientConfig, ClientError, Params};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve a single canned HTTP response and hand back the raw request.
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{addr}/v2"), handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..head_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= head_end + 4 + length
}

fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn client(base_url: String) -> Client {
    Client::new(ClientConfig {
        base_url,
        api_key: Some("secret".to_string()),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn no_content_is_empty_success() {
    let (base_url, server) =
        serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()).await;

    let response = client(base_url).devices().location("dev1").await.unwrap();
    assert_eq!(response.status, 204);
    assert!(response.body.is_none());

    let raw = server.await.unwrap();
    assert!(raw.starts_with("GET /v2/devices/dev1/location HTTP/1.1"));
}

#[tokio::test]
async fn error_status_keeps_body() {
    let body = r#"{"code":"not_found","message":"Device not found"}"#;
    let (base_url, server) = serve_once(json_response("404 Not Found", body)).await;

    let err = client(base_url).devices().view("missing").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::ApiError {
            status: 404,
            message: body.to_string(),
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn search_sends_query_and_key() {
    let (base_url, server) =
        serve_once(json_response("200 OK", r#"{"devices":[],"total":0}"#)).await;

    let mut filters = Params::new();
    filters.insert("q".into(), json!("boiler"));
    let response = client(base_url).devices().search(filters).await.unwrap();
    assert_eq!(response.body, Some(json!({"devices": [], "total": 0})));

    let raw = server.await.unwrap();
    let lower = raw.to_ascii_lowercase();
    assert!(raw.starts_with("GET /v2/devices?q=boiler HTTP/1.1"));
    assert!(lower.contains("x-m2x-key: secret"));
    assert!(!lower.contains("content-type"));
}

#[tokio::test]
async fn update_sends_single_json_content_type() {
    let (base_url, server) = serve_once(json_response("200 OK", "")).await;

    let mut fields = Params::new();
    fields.insert("name".into(), json!("boiler"));
    fields.insert("metadata".into(), json!({"floor": 2}));
    client(base_url)
        .devices()
        .update("dev1", fields)
        .await
        .unwrap();

    let raw = server.await.unwrap();
    let lower = raw.to_ascii_lowercase();
    assert!(raw.starts_with("PUT /v2/devices/dev1 HTTP/1.1"));
    assert_eq!(lower.matches("content-type: application/json").count(), 1);

    let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let sent: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(sent, json!({"name": "boiler", "metadata": {"floor": 2}}));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}/v2"))
        .devices()
        .groups()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Request(_)));
}
