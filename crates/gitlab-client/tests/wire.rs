//! Wire-level checks for the REST client against a one-shot local server.
//!
//! Each test binds an ephemeral TCP listener, captures the single raw HTTP
//! request the client sends, and replies with a canned response.  This
//! pins down the header contract: the credential header on every request,
//! and a JSON content type exactly when a body is sent.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use lg_domain::config::GitLabConfig;
use lg_domain::error::Error;
use lg_gitlab::{GitLabProvider, RestGitLabClient};

const OK_JSON: &str =
    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}";
const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n";

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read one full HTTP request (head + content-length body).
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find_subslice(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Accept one connection, reply with `response`, return the captured request.
async fn one_shot_server(response: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        captured
    });
    (format!("http://{addr}"), handle)
}

fn client_for(base_url: &str) -> RestGitLabClient {
    let cfg = GitLabConfig {
        base_url: base_url.to_owned(),
        token: None,
        timeout_secs: 5,
    };
    RestGitLabClient::new(&cfg, "glpat-test").unwrap()
}

#[tokio::test]
async fn get_carries_the_credential_and_no_content_type() {
    let (base_url, server) = one_shot_server(OK_JSON).await;
    let client = client_for(&base_url);

    client.get("/projects/42/hooks", &[]).await.unwrap();

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /projects/42/hooks http/1.1"));
    assert!(request.contains("private-token: glpat-test"));
    assert!(!request.contains("content-type"));
}

#[tokio::test]
async fn post_carries_credential_json_content_type_and_body() {
    let (base_url, server) = one_shot_server(OK_JSON).await;
    let client = client_for(&base_url);

    let mut body = serde_json::Map::new();
    body.insert("url".to_owned(), serde_json::Value::from("https://x.com"));
    client.post("/projects/42/hooks", &body).await.unwrap();

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(lower.starts_with("post /projects/42/hooks http/1.1"));
    assert!(lower.contains("private-token: glpat-test"));
    assert!(lower.contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"url":"https://x.com"}"#));
}

#[tokio::test]
async fn put_sends_a_json_body_too() {
    let (base_url, server) = one_shot_server(OK_JSON).await;
    let client = client_for(&base_url);

    let mut body = serde_json::Map::new();
    body.insert("value".to_owned(), serde_json::Value::from("rotated"));
    client
        .put("/projects/42/variables/DEPLOY_KEY", &body)
        .await
        .unwrap();

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("put /projects/42/variables/deploy_key http/1.1"));
    assert!(request.contains("content-type: application/json"));
}

#[tokio::test]
async fn delete_sends_no_body_and_ignores_the_response_body() {
    let (base_url, server) = one_shot_server(NO_CONTENT).await;
    let client = client_for(&base_url);

    client.delete("/projects/42/triggers/9").await.unwrap();

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("delete /projects/42/triggers/9 http/1.1"));
    assert!(request.contains("private-token: glpat-test"));
    assert!(!request.contains("content-type"));
}

#[tokio::test]
async fn non_empty_query_is_url_encoded_onto_the_path() {
    let (base_url, server) = one_shot_server(OK_JSON).await;
    let client = client_for(&base_url);

    let query = vec![
        ("owned".to_owned(), "true".to_owned()),
        ("search".to_owned(), "plat form".to_owned()),
    ];
    client.get("/groups", &query).await.unwrap();

    let request = server.await.unwrap();
    let first_line = request.lines().next().unwrap();
    assert_eq!(first_line, "GET /groups?owned=true&search=plat+form HTTP/1.1");
}

#[tokio::test]
async fn empty_query_appends_no_query_string() {
    let (base_url, server) = one_shot_server(OK_JSON).await;
    let client = client_for(&base_url);

    client.get("/groups", &[]).await.unwrap();

    let first_line = server.await.unwrap().lines().next().unwrap().to_owned();
    assert_eq!(first_line, "GET /groups HTTP/1.1");
}

#[tokio::test]
async fn non_success_status_becomes_a_remote_rejection() {
    const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\ncontent-type: application/json\r\ncontent-length: 36\r\nconnection: close\r\n\r\n{\"message\":\"404 Project Not Found\"}\n";
    let (base_url, server) = one_shot_server(NOT_FOUND).await;
    let client = client_for(&base_url);

    let err = client.get("/projects/42/access_tokens", &[]).await.unwrap_err();
    server.await.unwrap();

    match err {
        Error::Remote { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "404 Project Not Found");
        }
        other => panic!("expected a remote rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_becomes_a_connectivity_failure() {
    // Bind then drop the listener so the port refuses connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let err = client.get("/projects/42/hooks", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Connectivity(_)));
}
