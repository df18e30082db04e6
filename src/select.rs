//! Neighbor selection policies.
//!
//! A selector decides, per node, which incident edges survive into a block:
//! all of them ([`FullNeighbors`], exact) or a uniform random subset of fixed
//! size ([`FixedFanout`], approximate). Selectors are stateless except for
//! the caller-supplied random source, so runs are reproducible given a fixed
//! seed and independent selectors may run in parallel.

use crate::graph::{EdgeId, NodeId};
use crate::{Error, Result};
use rand::prelude::*;

/// A policy choosing which incident edges of a node to keep.
pub trait NeighborSelector {
    /// Filter the incident edges of `node`.
    ///
    /// The returned edges must be a subset of `incident` with no duplicates.
    fn select<R: Rng>(
        &self,
        node: NodeId,
        incident: Vec<(NodeId, EdgeId)>,
        rng: &mut R,
    ) -> Vec<(NodeId, EdgeId)>;
}

/// Keep every incident edge. Deterministic; never consults the rng.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullNeighbors;

impl NeighborSelector for FullNeighbors {
    fn select<R: Rng>(
        &self,
        _node: NodeId,
        incident: Vec<(NodeId, EdgeId)>,
        _rng: &mut R,
    ) -> Vec<(NodeId, EdgeId)> {
        incident
    }
}

/// Keep up to `k` incident edges, drawn uniformly without replacement.
///
/// Nodes with `k` or fewer incident edges keep all of them unchanged; a node
/// with zero incident edges selects the empty set (it still receives a dst
/// slot in the block it seeds).
#[derive(Debug, Clone, Copy)]
pub struct FixedFanout {
    k: usize,
}

impl FixedFanout {
    /// Create a fixed-fanout policy. Fails with [`Error::InvalidFanout`]
    /// for `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidFanout { fanout: k });
        }
        Ok(Self { k })
    }

    /// The configured fanout.
    pub fn fanout(&self) -> usize {
        self.k
    }
}

impl NeighborSelector for FixedFanout {
    fn select<R: Rng>(
        &self,
        _node: NodeId,
        incident: Vec<(NodeId, EdgeId)>,
        rng: &mut R,
    ) -> Vec<(NodeId, EdgeId)> {
        if incident.len() <= self.k {
            incident
        } else {
            incident.choose_multiple(rng, self.k).copied().collect()
        }
    }
}
