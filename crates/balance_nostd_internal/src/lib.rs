#![no_std]
mod apply_pairs;
mod bins;
mod particle;
mod random;
mod state;

pub use apply_pairs::PairBinner;
pub use bins::{
    BinEdges, DeltaBinning, N_PHI_BINS, PHI_MIN, PeriodicBinEdges, RegularBinEdges,
};
pub use particle::{ParticleRecord, PtCut, SAME_PARTICLE_TOL};
pub use random::RandomSource;
pub use state::HistogramViewMut;
