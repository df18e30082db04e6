//! Property-based tests for dependency-block construction.
//!
//! These verify the invariants that must hold for any graph, any seed set,
//! and both selection policies:
//! - the dst side is a prefix of the src side
//! - no duplicate global ids on either side
//! - fixed fanout caps block in-degree at min(k, original in-degree)
//! - consecutive chain blocks agree on their shared frontier

use nodeflow::{
    BlockBuilder, FixedFanout, FixedFanoutSampler, FullNeighborSampler, Graph, NodeId, Sampler,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use std::collections::HashSet;

/// A small arbitrary graph plus a seed set drawn from its id range.
fn arb_graph_and_seeds() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<usize>)> {
    (1usize..24).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..80),
            prop::collection::vec(0..n, 0..24),
        )
    })
}

fn no_duplicates(ids: &[NodeId]) -> bool {
    let unique: HashSet<_> = ids.iter().collect();
    unique.len() == ids.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_prefix_invariant_full((n, edges, seeds) in arb_graph_and_seeds()) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let block = BlockBuilder::new(&graph).build_full(&seeds).unwrap();

        prop_assert_eq!(block.dst_ids(), &block.src_ids()[..block.num_dst()]);
        prop_assert!(no_duplicates(block.src_ids()));
        prop_assert!(no_duplicates(block.dst_ids()));
    }

    #[test]
    fn prop_prefix_invariant_fanout(
        (n, edges, seeds) in arb_graph_and_seeds(),
        k in 1usize..5,
        rng_seed in any::<u64>(),
    ) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let selector = FixedFanout::new(k).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(rng_seed);
        let block = BlockBuilder::new(&graph)
            .build(&seeds, &selector, &mut rng)
            .unwrap();

        prop_assert_eq!(block.dst_ids(), &block.src_ids()[..block.num_dst()]);
        prop_assert!(no_duplicates(block.src_ids()));
    }

    #[test]
    fn prop_fanout_bound(
        (n, edges, seeds) in arb_graph_and_seeds(),
        k in 1usize..5,
        rng_seed in any::<u64>(),
    ) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let selector = FixedFanout::new(k).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(rng_seed);
        let block = BlockBuilder::new(&graph)
            .build(&seeds, &selector, &mut rng)
            .unwrap();

        for (dst_local, &dst) in block.dst_ids().iter().enumerate() {
            let original = graph.in_degree(dst).unwrap();
            prop_assert_eq!(block.in_degree(dst_local), original.min(k));
        }
    }

    #[test]
    fn prop_full_selection_keeps_every_edge(
        (n, edges, seeds) in arb_graph_and_seeds(),
    ) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let block = BlockBuilder::new(&graph).build_full(&seeds).unwrap();

        for (dst_local, &dst) in block.dst_ids().iter().enumerate() {
            prop_assert_eq!(block.in_degree(dst_local), graph.in_degree(dst).unwrap());
        }
    }

    #[test]
    fn prop_chain_continuity(
        (n, edges, seeds) in arb_graph_and_seeds(),
        fanouts in prop::collection::vec(1usize..4, 1..4),
        rng_seed in any::<u64>(),
    ) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let mut sampler = FixedFanoutSampler::new(&graph, &fanouts, rng_seed).unwrap();
        let chain = sampler.sample(&seeds).unwrap();

        prop_assert_eq!(chain.num_layers(), fanouts.len());
        for pair in chain.blocks().windows(2) {
            prop_assert_eq!(pair[0].dst_ids(), pair[1].src_ids());
        }

        // seeds survive (deduplicated, first occurrence order) as the
        // chain's output node set
        let mut expected = Vec::new();
        for &s in &seeds {
            if !expected.contains(&s) {
                expected.push(s);
            }
        }
        prop_assert_eq!(chain.seeds(), expected.as_slice());
    }

    #[test]
    fn prop_full_sampling_idempotent(
        (n, edges, seeds) in arb_graph_and_seeds(),
        layers in 1usize..4,
    ) {
        let graph = Graph::from_edges(n, &edges).unwrap();
        let mut sampler = FullNeighborSampler::new(&graph, layers);
        let a = sampler.sample(&seeds).unwrap();
        let b = sampler.sample(&seeds).unwrap();
        prop_assert_eq!(a, b);
    }
}
