//! Remote manifest signing over HTTP.
//!
//! Issues a single `POST` to the configured signing-service endpoint with the
//! raw manifest bytes as the body. The request carries a fixed
//! `Content-Type: application/json` header (the service contract expects it
//! even though the body is not wrapped in a JSON envelope) plus any
//! configured extra headers. The full response payload of a `200` is the
//! signature; anything else is a signing failure.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::error::Error;
use crate::sign::ManifestSigner;
use crate::Result;

/// Signs manifests by delegating to a remote signing service.
///
/// No retry or backoff: a failure is terminal for the call, and retry policy
/// belongs to the caller. Transport-level faults (connection, TLS, timeout)
/// are wrapped into [`Error::Signing`] so callers handle one failure shape
/// regardless of cause.
#[derive(Debug)]
pub struct RemoteSigner {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl RemoteSigner {
    /// Build a signer for an endpoint with extra headers and a request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] when a header name or value is not legal
    /// HTTP, or the client cannot be constructed.
    pub fn new(
        endpoint: String,
        extra_headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Signing(format!("invalid signing header \"{name}\": {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Signing(format!("invalid signing header value: {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Signing(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }
}

impl ManifestSigner for RemoteSigner {
    fn sign(&self, manifest: &[u8]) -> Result<Vec<u8>> {
        debug!("requesting signature from {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .body(manifest.to_vec())
            .send()
            .map_err(|e| Error::Signing(format!("failed to sign manifest: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Signing(format!(
                "failed to sign manifest: {}",
                status_text(status)
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| Error::Signing(format!("failed to read signature response: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Human-readable status text, e.g. `"503 Service Unavailable"`.
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one HTTP response on an ephemeral port, returning the
    /// endpoint URL. Reads the full request (headers plus declared body)
    /// before responding, and hands the captured request back through a
    /// join handle.
    fn one_shot_server(
        status_line: &'static str,
        body: &'static [u8],
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(header_end) = find_header_end(&request) {
                    let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= header_end + content_length {
                        break;
                    }
                }
            }

            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/api/sign-manifest"), handle)
    }

    fn find_header_end(request: &[u8]) -> Option<usize> {
        request
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|p| p + 4)
    }

    #[test]
    fn test_success_returns_response_body() {
        let (endpoint, handle) = one_shot_server("200 OK", b"SIGNATURE-BYTES");
        let signer = RemoteSigner::new(
            endpoint,
            &[("x-team".to_string(), "ops".to_string())],
            Duration::from_secs(5),
        )
        .unwrap();

        let manifest = br#"{"pass.json":"da39a3ee"}"#;
        let signature = signer.sign(manifest).unwrap();
        assert_eq!(signature, b"SIGNATURE-BYTES");

        let request = handle.join().unwrap();
        assert!(request.starts_with("POST /api/sign-manifest HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.to_lowercase().contains("x-team: ops"));
        // The body is the raw manifest, not a JSON envelope around it.
        assert!(request.ends_with(std::str::from_utf8(manifest).unwrap()));
    }

    #[test]
    fn test_non_200_is_a_signing_failure_with_status_text() {
        let (endpoint, handle) = one_shot_server("503 Service Unavailable", b"busy");
        let signer = RemoteSigner::new(endpoint, &[], Duration::from_secs(5)).unwrap();

        let err = signer.sign(b"{}").unwrap_err();
        handle.join().unwrap();
        match err {
            Error::Signing(message) => assert!(message.contains("Service Unavailable")),
            other => panic!("expected Signing, got {other:?}"),
        }
    }

    #[test]
    fn test_even_other_2xx_statuses_fail() {
        let (endpoint, handle) = one_shot_server("202 Accepted", b"later");
        let signer = RemoteSigner::new(endpoint, &[], Duration::from_secs(5)).unwrap();

        let err = signer.sign(b"{}").unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, Error::Signing(_)));
    }

    #[test]
    fn test_transport_fault_is_a_signing_failure() {
        // Grab an ephemeral port and close it again so nothing listens there.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let signer = RemoteSigner::new(
            format!("http://127.0.0.1:{port}/sign"),
            &[],
            Duration::from_secs(5),
        )
        .unwrap();

        let err = signer.sign(b"{}").unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
    }

    #[test]
    fn test_invalid_extra_header_is_rejected() {
        let err = RemoteSigner::new(
            "http://127.0.0.1:1/sign".to_string(),
            &[("bad header".to_string(), "v".to_string())],
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
    }
}
