//! Object storage writer
//!
//! Persists submission records to an S3-compatible bucket: one best-effort
//! `PUT Object` per record, signed with AWS Signature Version 4. No retry,
//! no queue; a failed write is reported to the caller and the record is
//! dropped.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use dpe_common::config::StorageConfig;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "s3";

/// Write client for an S3-compatible object store
pub struct StorageClient {
    /// HTTP client with configured timeouts
    client: Client,
    config: StorageConfig,
    /// Host header value derived from the endpoint
    host: String,
}

impl StorageClient {
    /// Create a new storage client
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (should not happen with
    /// valid config).
    pub fn new(config: StorageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        let host = endpoint_host(&config.endpoint);

        Self {
            client,
            config,
            host,
        }
    }

    /// Key prefix configured for submission records
    pub fn key_prefix(&self) -> &str {
        &self.config.key_prefix
    }

    /// Write one serialized record to `key` in the configured bucket
    ///
    /// Single attempt; any HTTP or transport failure surfaces as
    /// [`Error::Storage`].
    pub async fn put_record(&self, key: &str, body: String) -> Result<()> {
        self.put_record_at(key, body, dpe_common::time::now()).await
    }

    /// [`put_record`](Self::put_record) with an explicit signing time
    pub async fn put_record_at(
        &self,
        key: &str,
        body: String,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let path = format!("/{}/{}", self.config.bucket, key);
        let url = format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            uri_encode_path(&path)
        );

        let payload_hash = sha256_hex(body.as_bytes());
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let authorization =
            self.authorization_header(&path, &payload_hash, &amz_date, now);

        debug!("PUT {} ({} bytes)", url, body.len());

        let response = self
            .client
            .put(&url)
            .header("authorization", authorization)
            .header("content-type", "application/json")
            .header("x-amz-content-sha256", payload_hash)
            .header("x-amz-date", amz_date)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "PUT {} returned {}",
                key,
                response.status()
            )));
        }
        Ok(())
    }

    /// Signature V4 authorization header for a PUT of `path`
    fn authorization_header(
        &self,
        path: &str,
        payload_hash: &str,
        amz_date: &str,
        now: DateTime<Utc>,
    ) -> String {
        let date = now.format("%Y%m%d").to_string();
        let signed_headers = "content-type;host;x-amz-content-sha256;x-amz-date";

        let canonical_request = format!(
            "PUT\n{}\n\ncontent-type:application/json\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            uri_encode_path(path),
            self.host,
            payload_hash,
            amz_date,
            signed_headers,
            payload_hash
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.config.region, SERVICE);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let key = signing_key(&self.config.secret_key, &date, &self.config.region, SERVICE);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.config.access_key, scope, signed_headers, signature
        )
    }
}

/// Derive the Host header value from an endpoint URL
fn endpoint_host(endpoint: &str) -> String {
    endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

/// Signature V4 signing key derivation
fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Percent-encode a URI path, leaving unreserved characters and `/` intact
fn uri_encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
