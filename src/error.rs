//! Error types for nodeflow.

use thiserror::Error;

/// Error type for dependency-construction operations.
///
/// Construction-time configuration errors ([`Error::InvalidFanout`],
/// [`Error::EmptyFanout`], [`Error::InvalidBatchSize`]) are surfaced when a
/// sampler or driver is created, never mid-run. [`Error::OutOfRange`] is
/// fatal and propagates immediately; nothing in this crate retries.
///
/// Empty seed sets and short final batches are normal conditions, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A referenced node id exceeds the graph bounds.
    #[error("node id {node} out of range for graph with {node_count} nodes")]
    OutOfRange { node: usize, node_count: usize },

    /// A non-positive fanout was configured.
    #[error("fixed fanout must be at least 1, got {fanout}")]
    InvalidFanout { fanout: usize },

    /// An empty fanout list was supplied; the list defines the layer count.
    #[error("fanout list must name at least one layer")]
    EmptyFanout,

    /// A batch size of zero was configured.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// A feature matrix disagrees with the expected row count.
    #[error("feature matrix has {got} rows, expected {expected}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Result type for dependency-construction operations.
pub type Result<T> = std::result::Result<T, Error>;
