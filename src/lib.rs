#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Minibatch computation-dependency construction for graph neural networks.
//!
//! Training an L-layer message-passing model on a graph that does not fit in
//! accelerator memory requires knowing, for each batch of "seed" nodes,
//! exactly which input nodes and edges their layer-L outputs depend on. This
//! crate builds that dependency structure: a chain of sparse bipartite
//! [`Block`]s, one per layer, with compacted index spaces ready for dense
//! feature tensors.
//!
//! # Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`Graph`] | Immutable adjacency index over a static graph |
//! | [`FullNeighbors`] / [`FixedFanout`] | Per-node edge selection policies |
//! | [`BlockBuilder`] | One seed set + one policy -> one [`Block`] |
//! | [`FullNeighborSampler`] / [`FixedFanoutSampler`] | L layers of blocks per seed set |
//! | [`MinibatchLoader`] | Shuffled fixed-size batches, one chain each |
//! | [`LayerwiseInference`] | Exact full-graph inference, one layer at a time |
//!
//! The neural network layers themselves, the optimizer, and feature storage
//! are external collaborators reached through [`LayerTransform`] and
//! [`FeatureStore`].
//!
//! # Example
//!
//! ```rust
//! use nodeflow::{FixedFanoutSampler, Graph, Sampler};
//!
//! let graph = Graph::from_edges(5, &[(0, 3), (1, 3), (2, 4), (3, 4)]).unwrap();
//!
//! // Two layers, at most 2 in-edges kept per node per layer.
//! let mut sampler = FixedFanoutSampler::new(&graph, &[2, 2], 42).unwrap();
//! let chain = sampler.sample(&[4]).unwrap();
//!
//! assert_eq!(chain.num_layers(), 2);
//! assert_eq!(chain.seeds(), &[4]);
//! // chain.input_ids() names the raw feature rows to fetch.
//! ```

pub mod batch;
pub mod block;
pub mod error;
pub mod features;
pub mod graph;
pub mod infer;
pub mod sampler;
pub mod select;

pub use batch::{BatchConfig, Epoch, Minibatch, MinibatchLoader};
pub use block::{Block, BlockBuilder};
pub use error::{Error, Result};
pub use features::{DenseFeatures, FeatureStore, LayerTransform};
pub use graph::{EdgeId, Graph, GraphStats, NodeId};
pub use infer::LayerwiseInference;
pub use sampler::{BlockChain, FixedFanoutSampler, FullNeighborSampler, Sampler};
pub use select::{FixedFanout, FullNeighbors, NeighborSelector};

// Re-export petgraph for advanced graph operations
pub use petgraph;
