//! External collaborator interfaces: layer transforms and feature storage.
//!
//! The core never inspects feature contents; it only manages which rows are
//! needed and how they align. Both collaborators work in terms of a block's
//! compacted local id spaces.

use crate::block::Block;
use crate::graph::NodeId;
use crate::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};

/// One GNN layer as a black box: message aggregation plus transform.
///
/// `dst` is conventionally the prefix slice of `src` of length
/// `block.num_dst()` (the block's prefix invariant makes that slice the
/// destination self-features). The returned matrix must be dst-aligned: one
/// row per destination node, in destination order. A destination with no
/// in-edges aggregates over an empty neighbor set; defining that result
/// (conventionally all-zero) is this collaborator's contract.
pub trait LayerTransform {
    fn apply(
        &self,
        block: &Block,
        src: ArrayView2<f32>,
        dst: ArrayView2<f32>,
    ) -> Result<Array2<f32>>;
}

/// Materializes feature rows for resolved node-id lists.
///
/// This is where any slow-storage I/O belongs; the sampling path itself
/// never blocks.
pub trait FeatureStore {
    /// Fetch one feature row per id, in the same order as `ids`.
    fn fetch(&self, ids: &[NodeId]) -> Result<Array2<f32>>;
}

/// In-memory feature store over a dense `(num_nodes, dim)` matrix, row `i`
/// holding node `i`'s features.
#[derive(Debug, Clone)]
pub struct DenseFeatures {
    rows: Array2<f32>,
}

impl DenseFeatures {
    /// Wrap a dense feature matrix.
    pub fn new(rows: Array2<f32>) -> Self {
        Self { rows }
    }

    /// Number of feature rows.
    pub fn num_rows(&self) -> usize {
        self.rows.nrows()
    }

    /// Feature dimension.
    pub fn dim(&self) -> usize {
        self.rows.ncols()
    }
}

impl FeatureStore for DenseFeatures {
    fn fetch(&self, ids: &[NodeId]) -> Result<Array2<f32>> {
        for &id in ids {
            if id >= self.rows.nrows() {
                return Err(Error::OutOfRange {
                    node: id,
                    node_count: self.rows.nrows(),
                });
            }
        }
        Ok(self.rows.select(Axis(0), ids))
    }
}
