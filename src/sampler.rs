//! Multi-layer samplers producing block chains.
//!
//! The seed set is fixed by the task; each layer's required inputs are only
//! discoverable after the layer above it has been resolved. Growth therefore
//! proceeds backward from the outputs toward the raw inputs, while the
//! eventual numerical computation runs forward across the returned chain:
//!
//! ```text
//! frontier := seeds
//! for layer in L..1:
//!     block := build(frontier, selector_for(layer))
//!     frontier := block.src_ids
//! chain := blocks reversed (layer 1 first)
//! ```
//!
//! The chain is assembled as an explicit stack and reversed once at the end,
//! rather than by list prepending.

use crate::block::{Block, BlockBuilder};
use crate::graph::{Graph, NodeId};
use crate::select::FixedFanout;
use crate::Result;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

/// An ordered sequence of blocks, one per GNN layer, layer 1 first.
///
/// [`BlockChain::seeds`] is the destination side of the last block (the
/// nodes the minibatch ultimately needs); [`BlockChain::input_ids`] is the
/// source side of the first block (the raw feature rows the caller must
/// fetch). For consecutive blocks, `chain[k].dst_ids() == chain[k+1].src_ids()`:
/// each layer's output-node set is exactly the frontier demanded by the
/// layer above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockChain {
    blocks: Vec<Block>,
}

impl BlockChain {
    /// Assemble a chain from blocks ordered layer 1 first.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The blocks, layer 1 first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.blocks.len()
    }

    /// True when the chain has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Global ids of the nodes whose layer-L output this chain computes.
    pub fn seeds(&self) -> &[NodeId] {
        self.blocks.last().map_or(&[], |b| b.dst_ids())
    }

    /// Global ids of the raw-feature rows required to evaluate the chain.
    pub fn input_ids(&self) -> &[NodeId] {
        self.blocks.first().map_or(&[], |b| b.src_ids())
    }

    /// Iterate blocks in evaluation order (layer 1 first).
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Consume the chain, yielding its blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl IntoIterator for BlockChain {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'a> IntoIterator for &'a BlockChain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Drives block construction across layers for one seed set.
///
/// An empty seed set yields a chain of `num_layers` blocks each with zero
/// destination nodes; an empty batch is a valid degenerate case, not an
/// error.
pub trait Sampler {
    /// Number of layers per chain.
    fn num_layers(&self) -> usize;

    /// Build the dependency chain for `seeds`.
    fn sample(&mut self, seeds: &[NodeId]) -> Result<BlockChain>;
}

/// Exact sampler: every layer keeps all incident edges.
///
/// Deterministic and idempotent; repeated calls with the same seed set yield
/// identical chains. Used for evaluation and inference consistency checks.
#[derive(Debug)]
pub struct FullNeighborSampler<'g> {
    graph: &'g Graph,
    num_layers: usize,
}

impl<'g> FullNeighborSampler<'g> {
    /// Create an exact sampler building `num_layers` blocks per chain.
    pub fn new(graph: &'g Graph, num_layers: usize) -> Self {
        Self { graph, num_layers }
    }
}

impl Sampler for FullNeighborSampler<'_> {
    fn num_layers(&self) -> usize {
        self.num_layers
    }

    fn sample(&mut self, seeds: &[NodeId]) -> Result<BlockChain> {
        let builder = BlockBuilder::new(self.graph);
        let mut stack = Vec::with_capacity(self.num_layers);
        let mut frontier: Vec<NodeId> = seeds.to_vec();

        for _ in 0..self.num_layers {
            let block = builder.build_full(&frontier)?;
            frontier = block.src_ids().to_vec();
            stack.push(block);
        }

        stack.reverse();
        Ok(BlockChain::new(stack))
    }
}

/// Approximate sampler: layer `i+1` keeps at most `fanouts[i]` incoming
/// edges per node, drawn uniformly without replacement.
///
/// `fanouts[0]` applies to layer 1 (closest to the raw input features).
/// Sampling is independent per node, per layer, per call, driven by an
/// owned xorshift rng, so runs are reproducible given a fixed seed.
#[derive(Debug)]
pub struct FixedFanoutSampler<'g> {
    graph: &'g Graph,
    selectors: Vec<FixedFanout>,
    rng: XorShiftRng,
}

impl<'g> FixedFanoutSampler<'g> {
    /// Create an approximate sampler with one fanout per layer.
    ///
    /// Fails with [`crate::Error::EmptyFanout`] for an empty list and
    /// [`crate::Error::InvalidFanout`] for any zero entry; configuration
    /// errors surface here, never mid-run.
    pub fn new(graph: &'g Graph, fanouts: &[usize], seed: u64) -> Result<Self> {
        if fanouts.is_empty() {
            return Err(crate::Error::EmptyFanout);
        }
        let selectors = fanouts
            .iter()
            .map(|&k| FixedFanout::new(k))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            graph,
            selectors,
            rng: XorShiftRng::seed_from_u64(seed),
        })
    }

    /// The configured per-layer fanouts, layer 1 first.
    pub fn fanouts(&self) -> Vec<usize> {
        self.selectors.iter().map(|s| s.fanout()).collect()
    }
}

impl Sampler for FixedFanoutSampler<'_> {
    fn num_layers(&self) -> usize {
        self.selectors.len()
    }

    fn sample(&mut self, seeds: &[NodeId]) -> Result<BlockChain> {
        let builder = BlockBuilder::new(self.graph);
        let mut stack = Vec::with_capacity(self.selectors.len());
        let mut frontier: Vec<NodeId> = seeds.to_vec();

        for layer in (0..self.selectors.len()).rev() {
            let block = builder.build(&frontier, &self.selectors[layer], &mut self.rng)?;
            frontier = block.src_ids().to_vec();
            stack.push(block);
        }

        stack.reverse();
        Ok(BlockChain::new(stack))
    }
}
