//! Layer-wise full-graph inference.
//!
//! Computing all L layers' full-neighbor dependencies jointly would demand,
//! for every node, its entire L-hop neighborhood at once — exponential in L
//! on high-degree graphs. This driver instead computes one layer for *all*
//! nodes before moving to the next, feeding each layer only the previous
//! layer's finished representations. Memory is bounded by one layer's
//! working set, traded for L sequential passes over the node set.
//!
//! The node enumeration is fixed to `0..node_count` and validated once
//! against the feature matrix, so layer outputs cannot silently misalign
//! between passes. Block construction within a layer is deterministic
//! (full-neighbor, no sampling) and runs across batches in parallel.

use crate::block::{Block, BlockBuilder};
use crate::features::LayerTransform;
use crate::graph::{Graph, NodeId};
use crate::{Error, Result};
use ndarray::{s, Array2};
use rayon::prelude::*;

/// Computes exact (unsampled) representations for every node, one GNN layer
/// at a time.
#[derive(Debug)]
pub struct LayerwiseInference<'g> {
    graph: &'g Graph,
    batch_size: usize,
}

impl<'g> LayerwiseInference<'g> {
    /// Create an inference driver processing `batch_size` nodes per block.
    ///
    /// Fails with [`Error::InvalidBatchSize`] for a zero batch size.
    pub fn new(graph: &'g Graph, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(Self { graph, batch_size })
    }

    /// Run `layers` in order over the whole graph, starting from `features`
    /// (row `i` holds node `i`'s raw features).
    ///
    /// Returns the final representations, row-aligned with the node ids.
    /// Fails with [`Error::ShapeMismatch`] if `features` does not have one
    /// row per node, or if a layer's output is not dst-aligned. An empty
    /// layer list returns the input unchanged.
    pub fn infer<L: LayerTransform>(
        &self,
        layers: &[L],
        features: Array2<f32>,
    ) -> Result<Array2<f32>> {
        let n = self.graph.node_count();
        if features.nrows() != n {
            return Err(Error::ShapeMismatch {
                expected: n,
                got: features.nrows(),
            });
        }

        let builder = BlockBuilder::new(self.graph);
        let node_ids: Vec<NodeId> = (0..n).collect();
        let mut h = features;

        for layer in layers {
            // All of this layer's single-layer full-neighbor blocks; batches
            // are independent and carry no sampling state.
            let blocks: Vec<Block> = node_ids
                .par_chunks(self.batch_size)
                .map(|batch| builder.build_full(batch))
                .collect::<Result<Vec<Block>>>()?;

            let mut next: Option<Array2<f32>> = None;
            let mut row = 0;
            for block in &blocks {
                let src = h.select(ndarray::Axis(0), block.src_ids());
                let dst = src.slice(s![..block.num_dst(), ..]);
                let out = layer.apply(block, src.view(), dst)?;

                if out.nrows() != block.num_dst() {
                    return Err(Error::ShapeMismatch {
                        expected: block.num_dst(),
                        got: out.nrows(),
                    });
                }

                let next = next.get_or_insert_with(|| Array2::zeros((n, out.ncols())));
                if out.ncols() != next.ncols() {
                    return Err(Error::ShapeMismatch {
                        expected: next.ncols(),
                        got: out.ncols(),
                    });
                }
                next.slice_mut(s![row..row + out.nrows(), ..]).assign(&out);
                row += out.nrows();
            }

            if let Some(next) = next {
                h = next;
            }
        }

        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::LayerTransform;
    use ndarray::{array, ArrayView2};

    /// Mean of in-neighbor rows; zero vector for nodes with no in-edges.
    struct MeanLayer;

    impl LayerTransform for MeanLayer {
        fn apply(
            &self,
            block: &Block,
            src: ArrayView2<f32>,
            _dst: ArrayView2<f32>,
        ) -> Result<Array2<f32>> {
            let mut out = Array2::zeros((block.num_dst(), src.ncols()));
            let mut counts = vec![0usize; block.num_dst()];
            for &(s, d) in block.edges() {
                let row = src.row(s).to_owned();
                out.row_mut(d).scaled_add(1.0, &row);
                counts[d] += 1;
            }
            for (d, &count) in counts.iter().enumerate() {
                if count > 0 {
                    out.row_mut(d).mapv_inplace(|v| v / count as f32);
                }
            }
            Ok(out)
        }
    }

    fn graph() -> Graph {
        Graph::from_edges(4, &[(0, 2), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn test_single_layer_mean() {
        let graph = graph();
        let features = array![[2.0], [4.0], [10.0], [0.0]];
        let driver = LayerwiseInference::new(&graph, 2).unwrap();
        let out = driver.infer(&[MeanLayer], features).unwrap();

        // node 2 <- mean(2, 4) = 3; node 3 <- 10; nodes 0, 1 have no in-edges
        assert_eq!(out, array![[0.0], [0.0], [3.0], [10.0]]);
    }

    #[test]
    fn test_zero_layers_is_identity() {
        let graph = graph();
        let features = array![[1.0], [2.0], [3.0], [4.0]];
        let driver = LayerwiseInference::new(&graph, 3).unwrap();
        let layers: Vec<MeanLayer> = Vec::new();
        assert_eq!(driver.infer(&layers, features.clone()).unwrap(), features);
    }

    #[test]
    fn test_feature_rows_validated() {
        let graph = graph();
        let driver = LayerwiseInference::new(&graph, 2).unwrap();
        let err = driver.infer(&[MeanLayer], array![[1.0], [2.0]]).unwrap_err();
        assert_eq!(err, Error::ShapeMismatch { expected: 4, got: 2 });
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let graph = graph();
        assert_eq!(
            LayerwiseInference::new(&graph, 0).unwrap_err(),
            Error::InvalidBatchSize
        );
    }

    #[test]
    fn test_batch_size_does_not_change_result() {
        let graph = graph();
        let features = array![[2.0], [4.0], [10.0], [6.0]];

        let whole = LayerwiseInference::new(&graph, 4)
            .unwrap()
            .infer(&[MeanLayer, MeanLayer], features.clone())
            .unwrap();
        let batched = LayerwiseInference::new(&graph, 1)
            .unwrap()
            .infer(&[MeanLayer, MeanLayer], features)
            .unwrap();
        assert_eq!(whole, batched);
    }
}
