//! Coordinator: places uploads on nodes and serves downloads from the index

use crate::common::{timestamp_now, validate_name, CoordinatorConfig, Node, Result};
use crate::coordinator::metadata::{FileRecord, MetadataStore};
use crate::coordinator::node_client::NodeClient;
use crate::coordinator::placement::PlacementManager;
use crate::coordinator::staging::{stage_response, StagedFile};
use bytes::Bytes;
use reqwest::Body;
use std::path::{Path, PathBuf};

/// Content of an upload.
#[derive(Debug)]
pub enum Content {
    /// In-memory bytes; the size is their length
    Bytes(Bytes),
    /// An open file, streamed; the size comes from its metadata
    File(tokio::fs::File),
}

impl Content {
    /// Determine the size and turn the content into a request body.
    async fn into_body(self, name: &str) -> Result<(Body, u64)> {
        match self {
            Content::Bytes(bytes) => {
                let size = bytes.len() as u64;
                Ok((Body::from(bytes), size))
            }
            Content::File(file) => {
                let meta = file
                    .metadata()
                    .await
                    .map_err(|e| crate::Error::SizeUnavailable {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })?;

                if !meta.is_file() {
                    return Err(crate::Error::SizeUnavailable {
                        name: name.to_string(),
                        reason: "not a regular file".into(),
                    });
                }

                Ok((Body::from(file), meta.len()))
            }
        }
    }
}

impl From<Bytes> for Content {
    fn from(bytes: Bytes) -> Self {
        Content::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(Bytes::from(bytes))
    }
}

impl From<tokio::fs::File> for Content {
    fn from(file: tokio::fs::File) -> Self {
        Content::File(file)
    }
}

pub struct Coordinator {
    placement: PlacementManager,
    metadata: MetadataStore,
    client: NodeClient,
    staging_dir: PathBuf,
    verify_download_size: bool,
}

impl Coordinator {
    /// Coordinator over `nodes` with default settings. Fails if `nodes` is empty.
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        Self::from_config(&CoordinatorConfig::with_nodes(nodes))
    }

    pub fn from_config(config: &CoordinatorConfig) -> Result<Self> {
        config.validate()?;

        let coordinator = Self {
            placement: PlacementManager::new(config.nodes.clone())?,
            metadata: MetadataStore::new(),
            client: NodeClient::new(config)?,
            staging_dir: config.staging_dir(),
            verify_download_size: config.verify_download_size,
        };

        tracing::info!(
            "Coordinator ready with {} node(s), staging in {}",
            config.nodes.len(),
            coordinator.staging_dir.display()
        );

        Ok(coordinator)
    }

    /// Upload `content` under `name` to the next node in round-robin order.
    ///
    /// The record is written only after the node answers `200 OK`; on any
    /// error the index is left as it was.
    pub async fn put(&self, name: &str, content: impl Into<Content>) -> Result<()> {
        validate_name(name)?;
        let (body, size) = content.into().into_body(name).await?;

        let reservation = self.metadata.reserve_slot();
        let node = self.placement.next_node(reservation.slot()).clone();
        tracing::debug!(
            "Placing {} ({} bytes) on {} (slot {})",
            name,
            size,
            node,
            reservation.slot()
        );

        if let Err(e) = self.client.upload(&node, name, body, size).await {
            tracing::warn!("Upload of {} to {} failed: {}", name, node, e);
            return Err(e);
        }

        reservation.commit(FileRecord {
            name: name.to_string(),
            size,
            node: node.clone(),
            stored_at: timestamp_now(),
        });

        tracing::info!("Stored {} on {}", name, node);
        Ok(())
    }

    pub async fn put_bytes(&self, name: &str, bytes: impl Into<Bytes>) -> Result<()> {
        self.put(name, Content::Bytes(bytes.into())).await
    }

    /// Upload a local file under its file name. Returns the stored name.
    pub async fn put_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| crate::Error::InvalidName(path.display().to_string()))?;

        let file = tokio::fs::File::open(path).await?;
        self.put(name, Content::File(file)).await?;
        Ok(name.to_string())
    }

    /// Download `name` from the node recorded for it into a staged local file.
    ///
    /// Unknown names fail with [`crate::Error::NotFound`] without contacting
    /// any node. A partially staged file is removed on error.
    pub async fn get(&self, name: &str) -> Result<StagedFile> {
        let record = self
            .metadata
            .get(name)
            .ok_or_else(|| crate::Error::NotFound(name.to_string()))?;

        tracing::debug!("Fetching {} from {}", name, record.node);
        let response = self.client.download(&record.node, name).await?;
        let staged = stage_response(&self.staging_dir, name, &record.node, response).await?;

        if self.verify_download_size && staged.size() != record.size {
            tracing::warn!(
                "Size mismatch for {} from {}: expected {}, got {}",
                name,
                record.node,
                record.size,
                staged.size()
            );
            return Err(crate::Error::SizeMismatch {
                name: name.to_string(),
                expected: record.size,
                actual: staged.size(),
            });
        }

        tracing::info!("Retrieved {} ({} bytes) from {}", name, staged.size(), record.node);
        Ok(staged)
    }

    pub fn nodes(&self) -> &[Node] {
        self.placement.nodes()
    }

    pub fn record(&self, name: &str) -> Option<FileRecord> {
        self.metadata.get(name)
    }

    /// All file records, sorted by name
    pub fn records(&self) -> Vec<FileRecord> {
        self.metadata.list()
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}
