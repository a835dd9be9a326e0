/*!
Computes two-particle balance functions and mixed-event normalized
correlation functions from ensembles of simulated particle events.

# High-Level: Balance Functions

Balance functions measure how charge (or another conserved quantity) is
balanced between particle pairs as a function of their separation in
rapidity (Δy) and azimuthal angle (Δφ). They are a standard observable in
the analysis of heavy-ion collisions.

An analysis involves 4 species roles: a, ā, b and b̄ (ā and b̄ are the
charge conjugates of a and b). Pairs are formed within each simulated event
and accumulated into 2D (Δy, Δφ) histograms for the opposite-sign (ab, āb̄)
and same-sign (ab̄, āb) channels. Pairing real events against randomly
chosen events from a mixed-event pool produces the reference histograms used
to normalize the correlation function.

# User Guide

1. Build a [`BalanceConfig`] (typically with
   [`BalanceConfig::from_parameters`]).
2. Create a [`BalanceAnalysis`], handing it a non-owning [`RandomHandle`] to
   a generator that you own.
3. Call [`BalanceAnalysis::calculate_balance_function`] with a
   [`ParticleSampleSource`] (such as [`InMemorySamples`]) and an output
   directory.

Progress is reported through the [`log`](https://docs.rs/log) facade.

# Developer Guide

The pairing and binning machinery lives in `balance_nostd_internal`. This
crate owns the histograms, drives the analysis over chunks of events and
reports the results.
*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the modules in this package
mod analysis;
mod config;
mod error;
mod histogram;
mod random;
mod report;
mod sample;

// pull in symbols that visible outside of the package
pub use analysis::BalanceAnalysis;
pub use balance_nostd_internal::{
    BinEdges, DeltaBinning, HistogramViewMut, N_PHI_BINS, PHI_MIN, PairBinner, ParticleRecord,
    PeriodicBinEdges, PtCut, RandomSource, RegularBinEdges,
};
pub use config::{BalanceConfig, ParameterMap, ParameterSource};
pub use error::Error;
pub use histogram::{Channel, HistogramStore};
pub use random::RandomHandle;
pub use report::{BalanceObservables, NORM_EPSILON, OutputNames, ParticleCounts};
pub use sample::{
    EventList, EventPool, InMemorySamples, ParticleSampleSource, Role, RoleCollections,
};
