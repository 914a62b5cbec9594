use crate::common::{CoordinatorConfig, Node, Result};
use reqwest::{header, Body, Client, Response, StatusCode};

/// HTTP client for the storage nodes' upload and download endpoints.
#[derive(Debug, Clone)]
pub struct NodeClient {
    client: Client,
}

impl NodeClient {
    pub fn new(config: &CoordinatorConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::InvalidConfig(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// `PUT /upload/{name}` with the full body. Only `200 OK` counts as accepted.
    pub async fn upload(&self, node: &Node, name: &str, body: Body, size: u64) -> Result<()> {
        let response = self
            .client
            .put(node.upload_url(name))
            .header(header::CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .map_err(|source| crate::Error::Transport {
                node: node.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(crate::Error::UploadRejected {
                node: node.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    /// `GET /download/{name}`. The body is left unread for the caller to stream.
    pub async fn download(&self, node: &Node, name: &str) -> Result<Response> {
        let response = self
            .client
            .get(node.download_url(name))
            .send()
            .await
            .map_err(|source| crate::Error::Transport {
                node: node.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(crate::Error::DownloadRejected {
                node: node.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}
