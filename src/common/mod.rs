//! Common utilities and types shared across minidfs

pub mod config;
pub mod error;
pub mod node;
pub mod utils;

pub use config::{Config, CoordinatorConfig};
pub use error::{Error, Result};
pub use node::Node;
pub use utils::{encode_name, format_bytes, timestamp_now, validate_name};
