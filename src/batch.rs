//! Minibatch iteration over node id collections.
//!
//! Partitions a node id collection into fixed-size batches (final batch may
//! be shorter), invokes a [`Sampler`] per batch, and hands the resulting
//! chain plus the originating node ids to the training loop. When shuffling
//! is enabled the ids are reshuffled on every call to
//! [`MinibatchLoader::epoch`].
//!
//! A loader is not thread-safe for concurrent consumption; independent
//! loaders (with independent seeds) may run in parallel over the same
//! shared graph.

use crate::features::FeatureStore;
use crate::graph::NodeId;
use crate::sampler::{BlockChain, Sampler};
use crate::{Error, Result};
use ndarray::Array2;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

/// Minibatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Nodes per batch (default: 512).
    pub batch_size: usize,
    /// Shuffle the id collection before each epoch (default: true).
    pub shuffle: bool,
    /// Random seed for shuffling (default: 42).
    pub seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 512,
            shuffle: true,
            seed: 42,
        }
    }
}

impl BatchConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// One unit of training work: a dependency chain and the batch that
/// demanded it. The chain is owned exclusively by the consumer and is
/// discarded after one forward/backward pass.
#[derive(Debug, Clone)]
pub struct Minibatch {
    /// Global ids of this batch's seed nodes; equal to the chain's last
    /// block's dst ids whenever the loaded id collection is duplicate-free.
    pub seeds: Vec<NodeId>,
    /// The dependency chain, layer 1 first.
    pub chain: BlockChain,
}

impl Minibatch {
    /// Global ids of the raw-feature rows this batch requires.
    pub fn input_ids(&self) -> &[NodeId] {
        self.chain.input_ids()
    }

    /// Materialize the batch's raw input rows from a feature store.
    pub fn fetch_inputs<F: FeatureStore>(&self, store: &F) -> Result<Array2<f32>> {
        store.fetch(self.input_ids())
    }
}

/// Drives a sampler across shuffled fixed-size batches of a node id
/// collection.
#[derive(Debug)]
pub struct MinibatchLoader<S> {
    sampler: S,
    node_ids: Vec<NodeId>,
    config: BatchConfig,
    rng: XorShiftRng,
}

impl<S: Sampler> MinibatchLoader<S> {
    /// Create a loader over `node_ids`.
    ///
    /// Fails with [`Error::InvalidBatchSize`] for a zero batch size; the
    /// configuration error surfaces here, never mid-epoch.
    pub fn new(sampler: S, node_ids: Vec<NodeId>, config: BatchConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        let rng = XorShiftRng::seed_from_u64(config.seed);
        Ok(Self {
            sampler,
            node_ids,
            config,
            rng,
        })
    }

    /// Number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        self.node_ids.len().div_ceil(self.config.batch_size)
    }

    /// Start one pass over the id collection, reshuffling it first when
    /// shuffling is enabled. Batches are built lazily as the returned
    /// iterator is advanced.
    pub fn epoch(&mut self) -> Epoch<'_, S> {
        if self.config.shuffle {
            self.node_ids.shuffle(&mut self.rng);
        }
        Epoch {
            loader: self,
            cursor: 0,
        }
    }
}

/// Lazy iterator over one epoch's minibatches.
pub struct Epoch<'a, S> {
    loader: &'a mut MinibatchLoader<S>,
    cursor: usize,
}

impl<S: Sampler> Iterator for Epoch<'_, S> {
    type Item = Result<Minibatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.loader.node_ids.len() {
            return None;
        }
        let end = usize::min(
            self.cursor + self.loader.config.batch_size,
            self.loader.node_ids.len(),
        );
        let seeds: Vec<NodeId> = self.loader.node_ids[self.cursor..end].to_vec();
        self.cursor = end;

        Some(
            self.loader
                .sampler
                .sample(&seeds)
                .map(|chain| Minibatch { seeds, chain }),
        )
    }
}
