//! Boundary dataset retrieval.
//!
//! The world boundaries are fetched once per render cycle and decoded off
//! the UI loop. Results carry the render generation that requested them so
//! superseded responses can be dropped.

mod fetch;

pub use fetch::DatasetChannel;

/// Errors that can occur while fetching or decoding the boundaries dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// The request could not be sent or the body could not be read.
    Network(String),
    /// The server answered with a non-success status.
    Http(u16),
    /// The document is not valid JSON, TopoJSON or GeoJSON.
    Parse(String),
    /// The topology has no object with the requested name.
    MissingObject(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Network(msg) => write!(f, "Network error: {}", msg),
            DatasetError::Http(status) => write!(f, "HTTP status {}", status),
            DatasetError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DatasetError::MissingObject(name) => write!(f, "Topology has no object '{}'", name),
        }
    }
}

impl std::error::Error for DatasetError {}
