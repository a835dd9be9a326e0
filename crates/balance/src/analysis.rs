//! Drives the pair binning over every chunk of a particle sample source

use std::path::Path;

use log::{debug, info};

use balance_nostd_internal::{PairBinner, RandomSource};

use crate::report::{BalanceObservables, ParticleCounts};
use crate::sample::{EventPool, ParticleSampleSource, Role};
use crate::{BalanceConfig, Channel, Error, HistogramStore, RandomHandle};

/// (channel, role paired as "a", role paired as "b") for same-event pairs
const SAME_EVENT_CHANNELS: [(Channel, Role, Role); 4] = [
    (Channel::Ab, Role::A, Role::B),
    (Channel::AbarBbar, Role::ABar, Role::BBar),
    (Channel::AbBar, Role::A, Role::BBar),
    (Channel::AbarB, Role::ABar, Role::B),
];

/// (channel, same-event role, mixed-event role) for mixed-event pairs
///
/// NOTE: both same-sign combinations are accumulated into
/// `Channel::MixedAbBar` and `Channel::MixedAbarB` is never filled. The
/// mixed-event same-sign total (used to normalize the same-sign correlation
/// function) is unaffected since it sums the 2 channels.
const MIXED_EVENT_CHANNELS: [(Channel, Role, Role); 4] = [
    (Channel::MixedAb, Role::A, Role::B),
    (Channel::MixedAbarBbar, Role::ABar, Role::BBar),
    (Channel::MixedAbBar, Role::A, Role::BBar),
    (Channel::MixedAbBar, Role::ABar, Role::B),
];

/// A single balance function analysis.
///
/// The histograms and particle counters accumulate over every chunk that is
/// processed by this instance.
pub struct BalanceAnalysis<R> {
    config: BalanceConfig,
    binner: PairBinner,
    histograms: HistogramStore,
    counts: ParticleCounts,
    rng: RandomHandle<R>,
}

impl<R: RandomSource> BalanceAnalysis<R> {
    pub fn new(config: BalanceConfig, rng: RandomHandle<R>) -> Result<Self, Error> {
        let binner = config.pair_binner()?;
        let [n_rap_bins, n_phi_bins] = binner.binning().shape();
        Ok(Self {
            config,
            binner,
            histograms: HistogramStore::new(n_rap_bins, n_phi_bins)?,
            counts: ParticleCounts::default(),
            rng,
        })
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn histograms(&self) -> &HistogramStore {
        &self.histograms
    }

    pub fn counts(&self) -> ParticleCounts {
        self.counts
    }

    /// Consumes every chunk of `source`, then computes the observables and
    /// writes them into `output_dir`.
    pub fn calculate_balance_function(
        &mut self,
        source: &mut impl ParticleSampleSource,
        output_dir: &Path,
    ) -> Result<BalanceObservables, Error> {
        self.run(source)?;
        let observables = self.observables();
        observables.write(
            output_dir,
            self.config.particle_alpha,
            self.config.particle_beta,
        )?;
        Ok(observables)
    }

    /// Loads and processes chunks until `source` is exhausted
    pub fn run(&mut self, source: &mut impl ParticleSampleSource) -> Result<(), Error> {
        let buffer_size = source.event_buffer_size();
        let mut event_id = 0;
        while !source.end_of_data() {
            info!(
                "reading events {}-{} ...",
                event_id + 1,
                event_id + buffer_size
            );
            source.load_next_chunk()?;
            source.load_next_mixed_chunk()?;
            self.process_chunk(&*source)?;
            event_id += buffer_size;
        }
        Ok(())
    }

    /// Bins the currently loaded chunk of `source`
    pub fn process_chunk(&mut self, source: &impl ParticleSampleSource) -> Result<(), Error> {
        let pt_cut = self.binner.pt_cut();
        self.counts.n_b +=
            pt_cut.count_qualifying(source.role_collection(EventPool::Same, Role::B));
        self.counts.n_bbar +=
            pt_cut.count_qualifying(source.role_collection(EventPool::Same, Role::BBar));

        for (channel, role_a, role_b) in SAME_EVENT_CHANNELS {
            debug!("calculating {channel} ...");
            self.binner
                .bin_same_event(
                    &mut self.histograms.view_mut(channel),
                    source.role_collection(EventPool::Same, role_a),
                    source.role_collection(EventPool::Same, role_b),
                )
                .map_err(Error::internal_legacy_adhoc)?;
        }

        debug!("calculating the correlation function using mixed events ...");
        let binner = &self.binner;
        let histograms = &mut self.histograms;
        self.rng.with_rng(|rng| -> Result<(), Error> {
            for (channel, role_a, role_b) in MIXED_EVENT_CHANNELS {
                binner
                    .bin_mixed_event(
                        &mut histograms.view_mut(channel),
                        source.role_collection(EventPool::Same, role_a),
                        source.role_collection(EventPool::Mixed, role_b),
                        rng,
                    )
                    .map_err(Error::internal_legacy_adhoc)?;
            }
            Ok(())
        })?
    }

    /// Derive the observables from everything processed so far
    pub fn observables(&self) -> BalanceObservables {
        BalanceObservables::compute(&self.histograms, &self.counts, self.binner.binning())
    }
}
