//! Storage node addressing

use crate::common::utils::encode_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A storage endpoint, identified by address and port.
///
/// Serialized as the `address:port` string, which is also how nodes are
/// written in config files and on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Node {
    pub address: String,
    pub port: u16,
}

impl Node {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// URL of this node's upload endpoint for `name`
    pub fn upload_url(&self, name: &str) -> String {
        format!(
            "http://{}:{}/upload/{}",
            self.address,
            self.port,
            encode_name(name)
        )
    }

    /// URL of this node's download endpoint for `name`
    pub fn download_url(&self, name: &str) -> String {
        format!(
            "http://{}:{}/download/{}",
            self.address,
            self.port,
            encode_name(name)
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

impl FromStr for Node {
    type Err = crate::Error;

    /// Parse `address:port`. The port is taken after the last colon.
    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        let (address, port) = s
            .rsplit_once(':')
            .ok_or_else(|| crate::Error::InvalidConfig(format!("node without port: {}", s)))?;

        if address.is_empty() {
            return Err(crate::Error::InvalidConfig(format!(
                "node without address: {}",
                s
            )));
        }

        let port = port
            .parse()
            .map_err(|_| crate::Error::InvalidConfig(format!("invalid node port: {}", s)))?;

        Ok(Node::new(address, port))
    }
}

impl TryFrom<String> for Node {
    type Error = crate::Error;

    fn try_from(s: String) -> crate::Result<Self> {
        s.parse()
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.to_string()
    }
}
