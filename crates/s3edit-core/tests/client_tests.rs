//! Wire-level tests for the object-store client
//!
//! Uses wiremock with the client's endpoint override (path-style
//! addressing), so the full signing path is exercised against a local
//! server. No real network access.

use s3edit_core::{Credentials, Error, ObjectLocation, ObjectStoreClient, Operation};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credentials() -> Credentials {
    Credentials {
        access_key: "AKIATEST".to_string(),
        secret_key: "testsecret".to_string(),
        region: "us-east-1".to_string(),
    }
}

fn client_for(server: &MockServer) -> ObjectStoreClient {
    ObjectStoreClient::new(test_credentials())
        .unwrap()
        .with_endpoint(&server.uri())
}

fn location() -> ObjectLocation {
    ObjectLocation::new("my-bucket", "/notes/today.txt").unwrap()
}

#[tokio::test]
async fn test_fetch_returns_body_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-bucket/notes/today.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("remember the milk\n", "text/markdown"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).fetch(&location()).await.unwrap();
    assert_eq!(result.status, 200);
    assert_eq!(result.body, "remember the milk\n");
    assert_eq!(result.content_type.as_deref(), Some("text/markdown"));
}

#[tokio::test]
async fn test_fetch_sends_sigv4_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-bucket/notes/today.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .mount(&server)
        .await;

    client_for(&server).fetch(&location()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;

    let auth = headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIATEST/"));
    assert!(auth.contains("/us-east-1/s3/aws4_request"));
    assert!(auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date"));

    // GET signs the empty-body hash
    assert_eq!(
        headers
            .get("x-amz-content-sha256")
            .unwrap()
            .to_str()
            .unwrap(),
        s3edit_core::sign::EMPTY_PAYLOAD_SHA256
    );
    assert!(headers.contains_key("x-amz-date"));
}

#[tokio::test]
async fn test_fetch_non_200_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-bucket/notes/today.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<Error>NoSuchKey</Error>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(&location()).await.unwrap_err();
    match err {
        Error::RemoteStatus {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, Operation::Get);
            assert_eq!(status, 404);
            assert_eq!(body, "<Error>NoSuchKey</Error>");
        }
        other => panic!("expected RemoteStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_put_sends_integrity_metadata_for_multibyte_text() {
    let server = MockServer::start().await;
    // "héllo" is 5 characters but 6 UTF-8 bytes
    let body = "héllo";
    Mock::given(method("PUT"))
        .and(path("/my-bucket/notes/today.txt"))
        .and(body_string(body))
        .and(header("content-length", "6"))
        .and(header("content-type", "text/markdown"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .put(&location(), body, Some("text/markdown"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    // PUT signs the hex SHA-256 of the payload and includes content-type
    // in the signed header set
    assert_eq!(
        headers
            .get("x-amz-content-sha256")
            .unwrap()
            .to_str()
            .unwrap(),
        s3edit_core::sign::sha256_hex(body.as_bytes())
    );
    let auth = headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.contains("SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date"));
}

#[tokio::test]
async fn test_put_defaults_content_type_to_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/my-bucket/notes/today.txt"))
        .and(header("content-type", "text/plain; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .put(&location(), "plain", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_round_trips_fetched_bytes_unchanged() {
    let server = MockServer::start().await;
    let original = "line one\nliné two\n";
    Mock::given(method("GET"))
        .and(path("/my-bucket/notes/today.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(original))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/my-bucket/notes/today.txt"))
        .and(body_string(original))
        .and(header("content-length", original.len().to_string().as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let fetched = client.fetch(&location()).await.unwrap();
    // a no-op edit writes back the identical byte stream
    client
        .put(&location(), &fetched.body, fetched.content_type.as_deref())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_non_200_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/my-bucket/notes/today.txt"))
        .respond_with(ResponseTemplate::new(403).set_body_string("<Error>AccessDenied</Error>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .put(&location(), "new text", None)
        .await
        .unwrap_err();
    match err {
        Error::RemoteStatus {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, Operation::Put);
            assert_eq!(status, 403);
            assert_eq!(body, "<Error>AccessDenied</Error>");
        }
        other => panic!("expected RemoteStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_a_transport_error() {
    // port 1 is reserved and refuses connections
    let client = ObjectStoreClient::new(test_credentials())
        .unwrap()
        .with_endpoint("http://127.0.0.1:1");

    let err = client.fetch(&location()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
