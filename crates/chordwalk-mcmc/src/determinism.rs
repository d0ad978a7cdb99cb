use chordwalk_core::{derive_substream_seed, RngHandle};

/// Derives the deterministic seed used by chain `stream` of an experiment.
pub fn chain_seed(master_seed: u64, stream: u64) -> u64 {
    derive_substream_seed(master_seed, stream)
}

/// Builds one independent generator per chain, in stream order.
///
/// Chains that run concurrently must each own one of these handles.
pub fn chain_rngs(master_seed: u64, chains: usize) -> Vec<RngHandle> {
    (0..chains as u64)
        .map(|stream| RngHandle::from_seed(chain_seed(master_seed, stream)))
        .collect()
}
