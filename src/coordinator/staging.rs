//! Local staging of downloaded files
//!
//! A download is streamed into a temporary file named after the requested
//! file. The temporary file is removed when the handle is dropped, so any
//! error before the handle reaches the caller cleans up after itself.

use crate::common::{encode_name, Node, Result};
use futures_util::StreamExt;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// A downloaded file staged on local disk, owned by the caller.
#[derive(Debug)]
pub struct StagedFile {
    name: String,
    size: u64,
    file: NamedTempFile,
}

impl StagedFile {
    /// Name the file was requested under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes written to the staged file
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read_to_vec(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path()).await?)
    }

    /// Move the staged file to `dest` and keep it.
    ///
    /// Falls back to a copy when `dest` is on another filesystem.
    pub fn persist(self, dest: impl AsRef<Path>) -> Result<File> {
        let dest = dest.as_ref();
        match self.file.persist(dest) {
            Ok(file) => Ok(file),
            Err(e) => {
                tracing::debug!("Rename to {} failed ({}), copying", dest.display(), e.error);
                std::fs::copy(e.file.path(), dest)?;
                Ok(File::open(dest)?)
            }
        }
    }

    /// Take the underlying temp file; it is still deleted when dropped.
    pub fn into_temp_file(self) -> NamedTempFile {
        self.file
    }
}

/// Stream a download response body into a new temp file in `dir`.
pub(crate) async fn stage_response(
    dir: &Path,
    name: &str,
    node: &Node,
    response: reqwest::Response,
) -> Result<StagedFile> {
    let file = tempfile::Builder::new()
        .prefix(&format!("{}.", encode_name(name)))
        .tempfile_in(dir)
        .map_err(crate::Error::Staging)?;

    let handle = file.as_file().try_clone().map_err(crate::Error::Staging)?;
    let mut out = tokio::fs::File::from_std(handle);

    let mut size = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|source| crate::Error::Transport {
            node: node.clone(),
            source,
        })?;
        out.write_all(&chunk).await.map_err(crate::Error::Staging)?;
        size += chunk.len() as u64;
    }
    out.flush().await.map_err(crate::Error::Staging)?;

    tracing::debug!("Staged {} ({} bytes) at {}", name, size, file.path().display());

    Ok(StagedFile {
        name: name.to_string(),
        size,
        file,
    })
}
