//! Blob transfer to and from remote storage gateways.
//!
//! A `BlobStore` copies bytes to a remote and back. Nothing here touches key
//! material; callers encrypt before `put` and decrypt after `get`.
//!
//! Two gateways are supported:
//! - IPFS through a node's HTTP API (`/api/v0/add`, `/ipfs/{cid}`)
//! - Arweave through an upload relay (`/upload`) and a read gateway (`/{id}`)
//!
//! Every endpoint is configured explicitly through `IpfsConfig` and
//! `ArweaveConfig`; there is no process-wide base URL.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Result, Web3DataError};

/// Default IPFS node API.
pub const DEFAULT_IPFS_NODE: &str = "https://ipfs-gateway.v8-bellecour.iex.ec";

/// Default Arweave upload relay.
pub const DEFAULT_ARWEAVE_API: &str = "http://localhost:3000";

/// Default Arweave read gateway.
pub const DEFAULT_ARWEAVE_GATEWAY: &str = "https://arweave.net";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where an uploaded blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle {
    /// Content or transaction identifier accepted by `BlobStore::get`.
    pub id: String,
    /// Public URL the blob can be fetched from.
    pub locator: String,
}

/// Copies opaque bytes to a remote store and back.
pub trait BlobStore {
    /// Upload `bytes`, advertising them under the file name `name`.
    fn put(&self, bytes: &[u8], name: &str) -> Result<BlobHandle>;

    /// Download the blob identified by `id`.
    fn get(&self, id: &str) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// IPFS
// ---------------------------------------------------------------------------

/// Where and how to reach an IPFS node's HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    pub node_url: String,
    pub timeout: Duration,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_IPFS_NODE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Body of a successful `/api/v0/add` call.
#[derive(Debug, Deserialize)]
pub struct IpfsAddResponse {
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Size", default)]
    pub size: String,
}

/// [`BlobStore`] backed by an IPFS node: `add` for uploads, the node's
/// gateway path for downloads.
pub struct IpfsStore {
    client: Client,
    config: IpfsConfig,
}

impl IpfsStore {
    /// Build the HTTP client. Makes no request.
    pub fn new(config: IpfsConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    fn add_url(&self) -> String {
        format!("{}/api/v0/add", base(&self.config.node_url))
    }

    /// Public URL for a CID on the configured node.
    pub fn content_url(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", base(&self.config.node_url), cid)
    }
}

impl BlobStore for IpfsStore {
    fn put(&self, bytes: &[u8], name: &str) -> Result<BlobHandle> {
        let url = self.add_url();
        debug!(%url, len = bytes.len(), "uploading to IPFS");

        let response = self
            .client
            .post(&url)
            .multipart(file_form(bytes, name))
            .send()
            .map_err(|e| Web3DataError::Transfer(format!("IPFS upload request failed: {e}")))?;
        let body = success_text(response)?;

        // The API may stream one JSON object per line (e.g. when wrapping a
        // directory); the last one describes the root.
        let last = body.lines().filter(|l| !l.trim().is_empty()).last().unwrap_or("");
        let added: IpfsAddResponse = serde_json::from_str(last)
            .map_err(|e| Web3DataError::Transfer(format!("invalid IPFS response: {e}")))?;

        info!(cid = %added.hash, size = %added.size, "uploaded to IPFS");
        Ok(BlobHandle {
            locator: self.content_url(&added.hash),
            id: added.hash,
        })
    }

    fn get(&self, id: &str) -> Result<Vec<u8>> {
        let url = self.content_url(id);
        debug!(%url, "downloading from IPFS");
        download(&self.client, &url)
    }
}

// ---------------------------------------------------------------------------
// Arweave
// ---------------------------------------------------------------------------

/// Endpoints for Arweave uploads (through a relay) and downloads (from a gateway).
#[derive(Debug, Clone)]
pub struct ArweaveConfig {
    /// Relay that accepts multipart uploads at `{api_url}/upload`.
    pub api_url: String,
    /// Gateway that serves transactions at `{gateway_url}/{id}`.
    pub gateway_url: String,
    pub timeout: Duration,
}

impl Default for ArweaveConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ARWEAVE_API.to_string(),
            gateway_url: DEFAULT_ARWEAVE_GATEWAY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Body of a successful relay upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArweaveUploadResponse {
    pub arweave_id: String,
    pub url: String,
}

/// [`BlobStore`] that uploads through an Arweave relay and reads from a gateway.
pub struct ArweaveStore {
    client: Client,
    config: ArweaveConfig,
}

impl ArweaveStore {
    /// Build the HTTP client. Makes no request.
    pub fn new(config: ArweaveConfig) -> Result<Self> {
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload", base(&self.config.api_url))
    }

    /// Gateway URL for a transaction ID.
    pub fn content_url(&self, id: &str) -> String {
        format!("{}/{}", base(&self.config.gateway_url), id)
    }
}

impl BlobStore for ArweaveStore {
    fn put(&self, bytes: &[u8], name: &str) -> Result<BlobHandle> {
        let url = self.upload_url();
        debug!(%url, len = bytes.len(), "uploading to Arweave relay");

        let response = self
            .client
            .post(&url)
            .multipart(file_form(bytes, name))
            .send()
            .map_err(|e| Web3DataError::Transfer(format!("Arweave upload request failed: {e}")))?;
        let body = success_text(response)?;

        let uploaded: ArweaveUploadResponse = serde_json::from_str(&body)
            .map_err(|e| Web3DataError::Transfer(format!("invalid Arweave response: {e}")))?;

        info!(id = %uploaded.arweave_id, "uploaded to Arweave");
        Ok(BlobHandle {
            id: uploaded.arweave_id,
            locator: uploaded.url,
        })
    }

    fn get(&self, id: &str) -> Result<Vec<u8>> {
        let url = self.content_url(id);
        debug!(%url, "downloading from Arweave");
        download(&self.client, &url)
    }
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Web3DataError::Transfer(format!("failed to build HTTP client: {e}")))
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn file_form(bytes: &[u8], name: &str) -> Form {
    let part = Part::bytes(bytes.to_vec()).file_name(name.to_string());
    Form::new().part("file", part)
}

/// Anything but 200 is a failure, reported with the body as diagnostic text.
fn ensure_ok(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    warn!(status = status.as_u16(), "remote rejected request");
    Err(Web3DataError::Remote {
        status: status.as_u16(),
        body,
    })
}

fn success_text(response: Response) -> Result<String> {
    ensure_ok(response)?
        .text()
        .map_err(|e| Web3DataError::Transfer(format!("failed to read response body: {e}")))
}

fn download(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| Web3DataError::Transfer(format!("download request failed: {e}")))?;
    let bytes = ensure_ok(response)?
        .bytes()
        .map_err(|e| Web3DataError::Transfer(format!("failed to read response body: {e}")))?;

    info!(%url, len = bytes.len(), "download complete");
    Ok(bytes.to_vec())
}
