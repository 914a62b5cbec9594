//! # minidfs
//!
//! A minimal client-side coordinator for a distributed file store:
//! - A fixed, ordered list of storage nodes
//! - Round-robin placement of each uploaded file on one node
//! - An in-memory index of where every file landed
//! - Downloads staged into local temporary files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Coordinator                │
//! │   placement: slot mod node count        │
//! │   index: file name → (node, size)       │
//! └───────────┬─────────────────────────────┘
//!             │ HTTP  PUT /upload/{name}
//!             │       GET /download/{name}
//!   ┌─────────┴──────────┬──────────────┐
//!   │                    │              │
//! ┌─▼──────────┐   ┌─────▼──────┐   ┌───▼────────┐
//! │ Node 1     │   │ Node 2     │   │ Node 3     │
//! │ files 0,3… │   │ files 1,4… │   │ files 2,5… │
//! └────────────┘   └────────────┘   └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo() -> minidfs::Result<()> {
//! use minidfs::{Coordinator, Node};
//!
//! let coordinator = Coordinator::new(vec![
//!     Node::new("10.0.0.1", 8080),
//!     Node::new("10.0.0.2", 8080),
//! ])?;
//!
//! coordinator.put_bytes("hello.txt", "hello world").await?;
//! let staged = coordinator.get("hello.txt").await?;
//! staged.persist("./hello.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Use the CLI
//! ```bash
//! # Upload files and fetch them back
//! minidfs --nodes 10.0.0.1:8080,10.0.0.2:8080 roundtrip a.bin b.bin --output ./out
//!
//! # Interactive session
//! minidfs --nodes 10.0.0.1:8080 shell
//! ```

pub mod common;
pub mod coordinator;

// Re-export commonly used types
pub use common::{Config, CoordinatorConfig, Error, Node, Result};
pub use coordinator::{Content, Coordinator, FileRecord, StagedFile};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
