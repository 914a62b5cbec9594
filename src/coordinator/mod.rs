//! Coordinator implementation
//!
//! The coordinator is responsible for:
//! - Placement decisions (round-robin over a fixed node list)
//! - Metadata management (file name → node and size)
//! - Upload and download requests to storage nodes
//! - Staging downloaded files locally

pub mod metadata;
pub mod node_client;
pub mod placement;
pub mod server;
pub mod staging;

pub use metadata::FileRecord;
pub use server::{Content, Coordinator};
pub use staging::StagedFile;
