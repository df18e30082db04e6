//! Bipartite dependency blocks and their builder.
//!
//! A [`Block`] records, for one GNN layer, exactly which source nodes and
//! edges are needed to compute the representations of a set of destination
//! (seed) nodes. Both sides use compacted local index spaces so that feature
//! tensors can be packed densely:
//!
//! ```text
//! src locals  0..S  ->  src_ids[i]   (global ids, seeds first)
//! dst locals  0..D  ->  dst_ids[j]   (D <= S, prefix of the src side)
//! edges       (src_local, dst_local) "src contributes to dst's aggregation"
//! ```
//!
//! # Prefix invariant
//!
//! Every destination node also appears on the source side, at the same
//! relative position: `dst_ids()` is exactly the first `D` entries of
//! `src_ids()`. Consumers can therefore slice the first `D` rows of the
//! source-side feature matrix to obtain destination self-features without
//! any lookup.
//!
//! # Complexity
//!
//! Building a block is O(sum of selected degree) in time and space. A seed
//! with no selected edges still occupies a dst slot with zero in-edges; the
//! aggregation over its empty neighbor set is the layer collaborator's
//! contract to define (conventionally all-zero).

use crate::graph::{Graph, NodeId};
use crate::select::{FullNeighbors, NeighborSelector};
use crate::Result;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use std::collections::HashMap;

/// A bipartite dependency unit linking source nodes to the destination nodes
/// they feed, for one GNN layer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Global ids of the source side; the first `num_dst` entries are the
    /// destination side.
    src_ids: Vec<NodeId>,
    num_dst: usize,
    /// `(src_local, dst_local)` pairs.
    edges: Vec<(usize, usize)>,
}

impl Block {
    /// Global node ids of the source side, seeds first.
    pub fn src_ids(&self) -> &[NodeId] {
        &self.src_ids
    }

    /// Global node ids of the destination side; a prefix of [`Block::src_ids`].
    pub fn dst_ids(&self) -> &[NodeId] {
        &self.src_ids[..self.num_dst]
    }

    /// Number of source nodes.
    pub fn num_src(&self) -> usize {
        self.src_ids.len()
    }

    /// Number of destination nodes.
    pub fn num_dst(&self) -> usize {
        self.num_dst
    }

    /// Number of selected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Selected edges as `(src_local, dst_local)` pairs.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// In-degree of a destination node within this block. O(edges).
    pub fn in_degree(&self, dst_local: usize) -> usize {
        self.edges.iter().filter(|&&(_, d)| d == dst_local).count()
    }

    /// True when the block has no destination nodes.
    pub fn is_empty(&self) -> bool {
        self.num_dst == 0
    }
}

/// Builds one [`Block`] from a seed set and a neighbor-selection policy.
pub struct BlockBuilder<'g> {
    graph: &'g Graph,
}

impl<'g> BlockBuilder<'g> {
    /// Create a builder over `graph`.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Build the block for `seeds` under `selector`.
    ///
    /// Seeds are deduplicated preserving first occurrence and become the
    /// destination side; source endpoints of the selected incoming edges
    /// follow in first-seen order. Deterministic given a deterministic
    /// selector. Fails with [`crate::Error::OutOfRange`] if a seed exceeds
    /// the graph bounds.
    pub fn build<S, R>(&self, seeds: &[NodeId], selector: &S, rng: &mut R) -> Result<Block>
    where
        S: NeighborSelector,
        R: Rng,
    {
        let mut local: HashMap<NodeId, usize> = HashMap::with_capacity(seeds.len());
        let mut src_ids: Vec<NodeId> = Vec::with_capacity(seeds.len());

        for &seed in seeds {
            if !local.contains_key(&seed) {
                local.insert(seed, src_ids.len());
                src_ids.push(seed);
            }
        }
        let num_dst = src_ids.len();

        let mut edges = Vec::new();
        for dst_local in 0..num_dst {
            let seed = src_ids[dst_local];
            let incident = self.graph.in_edges(seed)?;
            let selected = selector.select(seed, incident, rng);

            for (src, _edge_id) in selected {
                let src_local = if let Some(&idx) = local.get(&src) {
                    idx
                } else {
                    let idx = src_ids.len();
                    local.insert(src, idx);
                    src_ids.push(src);
                    idx
                };
                edges.push((src_local, dst_local));
            }
        }

        Ok(Block {
            src_ids,
            num_dst,
            edges,
        })
    }

    /// Build a block keeping every incident edge.
    pub fn build_full(&self, seeds: &[NodeId]) -> Result<Block> {
        // FullNeighbors never consults the rng
        let mut rng = XorShiftRng::seed_from_u64(0);
        self.build(seeds, &FullNeighbors, &mut rng)
    }
}
