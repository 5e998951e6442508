//! Signed GET/PUT against the object store
//!
//! Buckets are addressed virtual-hosted style
//! (`https://<bucket>.s3.amazonaws.com<path>`). An endpoint override
//! switches to path-style addressing for S3-compatible stores (MinIO,
//! LocalStack) and test rigs.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{Error, Operation, Result};
use crate::sign::{sha256_hex, uri_encode_path, Signer, EMPTY_PAYLOAD_SHA256};

/// Content type assumed when the fetched object carried none
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Suffix of the virtual-hosted bucket endpoint
const S3_HOST_SUFFIX: &str = "s3.amazonaws.com";

/// Network operations block progress, so keep them bounded
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A bucket plus an absolute object path within it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    bucket: String,
    path: String,
}

impl ObjectLocation {
    /// Build a location, normalizing the path to exactly one leading slash
    pub fn new(bucket: &str, path: &str) -> Result<Self> {
        if bucket.is_empty() {
            return Err(Error::invalid_location("bucket name is empty"));
        }
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(Error::invalid_location("object path is empty"));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            path: format!("/{}", trimmed),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Absolute path within the bucket, always starting with one `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base filename of the object, used to name the editor temp file so
    /// the editor can pick syntax highlighting from the extension
    pub fn filename(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("untitled")
    }
}

/// The outcome of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

/// HTTP client issuing signed object-store requests
#[derive(Debug)]
pub struct ObjectStoreClient {
    http: Client,
    signer: Signer,
    endpoint: Option<String>,
}

impl ObjectStoreClient {
    /// Create a client from resolved credentials
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            signer: Signer::new(credentials),
            endpoint: None,
        })
    }

    /// Use a custom endpoint with path-style addressing instead of the
    /// virtual-hosted AWS endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Issue the signed GET and buffer the full response body as text
    pub async fn fetch(&self, location: &ObjectLocation) -> Result<FetchResult> {
        let (host, url, sign_path) = self.target(location);
        debug!("GET {}", url);

        let headers = self.signer.sign(
            "GET",
            &host,
            &sign_path,
            &BTreeMap::new(),
            EMPTY_PAYLOAD_SHA256,
            Utc::now(),
        );

        let response = apply_headers(self.http.get(&url), &headers).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        if status != 200 {
            return Err(Error::remote_status(Operation::Get, status, body));
        }
        debug!("fetched {} bytes from {}", body.len(), url);
        Ok(FetchResult {
            status,
            body,
            content_type,
        })
    }

    /// Issue the signed PUT with the payload hash, content type, and the
    /// UTF-8 byte length of the new body
    pub async fn put(
        &self,
        location: &ObjectLocation,
        body: &str,
        content_type: Option<&str>,
    ) -> Result<()> {
        let (host, url, sign_path) = self.target(location);
        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        // byte length, not character count
        let content_length = body.len();
        let payload_hash = sha256_hex(body.as_bytes());
        debug!("PUT {} ({} bytes)", url, content_length);

        let mut extra = BTreeMap::new();
        extra.insert("content-type".to_string(), content_type.to_string());
        let headers = self
            .signer
            .sign("PUT", &host, &sign_path, &extra, &payload_hash, Utc::now());

        let response = apply_headers(self.http.put(&url), &headers)
            .header(CONTENT_LENGTH, content_length)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await?;
            return Err(Error::remote_status(Operation::Put, status, body));
        }
        Ok(())
    }

    /// Resolve (host header value, request URL, canonical path) for a
    /// location under the active addressing scheme
    fn target(&self, location: &ObjectLocation) -> (String, String, String) {
        match &self.endpoint {
            Some(endpoint) => {
                // path-style: bucket becomes the first path segment
                let host = host_of(endpoint);
                let sign_path = format!("/{}{}", location.bucket(), location.path());
                let url = format!("{}{}", endpoint, uri_encode_path(&sign_path));
                (host, url, sign_path)
            }
            None => {
                let host = format!("{}.{}", location.bucket(), S3_HOST_SUFFIX);
                let sign_path = location.path().to_string();
                let url = format!("https://{}{}", host, uri_encode_path(&sign_path));
                (host, url, sign_path)
            }
        }
    }
}

/// Attach signed headers to a request, skipping `host` (set by the
/// transport from the URL; it must not be duplicated)
fn apply_headers(
    mut request: reqwest::RequestBuilder,
    headers: &BTreeMap<String, String>,
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        if name == "host" {
            continue;
        }
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

/// Strip the scheme and any trailing path from an endpoint, keeping the
/// port when present
fn host_of(endpoint: &str) -> String {
    let host = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint);
    host.split('/').next().unwrap_or(host).to_string()
}
