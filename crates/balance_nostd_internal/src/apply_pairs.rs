use core::f64::consts::PI;

use crate::bins::DeltaBinning;
use crate::particle::{ParticleRecord, PtCut};
use crate::random::RandomSource;
use crate::state::HistogramViewMut;

/// Forms particle pairs and bins them by their separation in rapidity and
/// azimuthal angle.
///
/// A single instance is shared by every histogram channel: the binning, the
/// pT window and the species relationship don't change over the course of
/// an analysis.
#[derive(Clone, Debug)]
pub struct PairBinner {
    binning: DeltaBinning,
    pt_cut: PtCut,
    same_species: bool,
}

impl PairBinner {
    /// `same_species` should be `true` when the b role is the charge
    /// conjugate of the a role. In that case, some channels pair a particle
    /// collection with itself and pairs of a particle with itself are
    /// excluded from same-event histograms.
    pub fn new(binning: DeltaBinning, pt_cut: PtCut, same_species: bool) -> Self {
        Self {
            binning,
            pt_cut,
            same_species,
        }
    }

    pub fn binning(&self) -> &DeltaBinning {
        &self.binning
    }

    pub fn pt_cut(&self) -> &PtCut {
        &self.pt_cut
    }

    pub fn same_species(&self) -> bool {
        self.same_species
    }

    fn check_hist_shape(&self, hist: &HistogramViewMut) -> Result<(), &'static str> {
        if hist.shape() != self.binning.shape() {
            Err("the histogram's shape is inconsistent with the pair binning")
        } else {
            Ok(())
        }
    }

    /// Bins every pair formed by a particle from `events_a[i]` and a
    /// particle from `events_b[i]`, for every event index `i`.
    ///
    /// Both particles must pass the pT cut. Pairs whose rapidity difference
    /// falls outside of the Δy range are silently dropped.
    pub fn bin_same_event<A, B>(
        &self,
        hist: &mut HistogramViewMut,
        events_a: &[A],
        events_b: &[B],
    ) -> Result<(), &'static str>
    where
        A: AsRef<[ParticleRecord]>,
        B: AsRef<[ParticleRecord]>,
    {
        self.check_hist_shape(hist)?;
        if events_a.len() != events_b.len() {
            return Err("same-event pairing requires both collections to hold the same events");
        }

        if self.same_species {
            self.bin_same_event_helper::<true, A, B>(hist, events_a, events_b);
        } else {
            self.bin_same_event_helper::<false, A, B>(hist, events_a, events_b);
        }
        Ok(())
    }

    fn bin_same_event_helper<const EXCLUDE_SELF: bool, A, B>(
        &self,
        hist: &mut HistogramViewMut,
        events_a: &[A],
        events_b: &[B],
    ) where
        A: AsRef<[ParticleRecord]>,
        B: AsRef<[ParticleRecord]>,
    {
        for (event_a, event_b) in events_a.iter().zip(events_b) {
            for part_a in event_a.as_ref().iter().filter(|p| self.pt_cut.accepts(p)) {
                for part_b in event_b.as_ref().iter().filter(|p| self.pt_cut.accepts(p)) {
                    if EXCLUDE_SELF && part_a.is_same_particle(part_b) {
                        continue;
                    }

                    let delta_phi = part_a.phi_p - part_b.phi_p;
                    let delta_y = part_a.rap_y - part_b.rap_y;
                    if let Some((y_bin, phi_bin)) = self.binning.bin_pair(delta_y, delta_phi) {
                        hist.increment(y_bin, phi_bin);
                    }
                }
            }
        }
    }

    /// Bins pairs between real events and randomly chosen events from a
    /// mixed-event pool.
    ///
    /// For each event in `events_a` a single partner event is drawn from
    /// `mixed_events_b` and reused for every particle of that event. Each
    /// individual pair has its azimuthal separation rotated by an
    /// independent uniform angle in `[0, 2π)`. There is no self-pair
    /// exclusion since the partners come from unrelated events.
    pub fn bin_mixed_event<A, B, R>(
        &self,
        hist: &mut HistogramViewMut,
        events_a: &[A],
        mixed_events_b: &[B],
        rng: &mut R,
    ) -> Result<(), &'static str>
    where
        A: AsRef<[ParticleRecord]>,
        B: AsRef<[ParticleRecord]>,
        R: RandomSource + ?Sized,
    {
        self.check_hist_shape(hist)?;
        if events_a.is_empty() {
            return Ok(());
        } else if mixed_events_b.is_empty() {
            return Err("the mixed-event pool doesn't hold any events");
        }

        for event_a in events_a {
            let partner = &mixed_events_b[rng.uniform_int(mixed_events_b.len())];
            for part_a in event_a.as_ref().iter().filter(|p| self.pt_cut.accepts(p)) {
                for part_b in partner.as_ref().iter().filter(|p| self.pt_cut.accepts(p)) {
                    let delta_phi = part_a.phi_p - part_b.phi_p + rng.uniform_real() * 2.0 * PI;
                    let delta_y = part_a.rap_y - part_b.rap_y;
                    if let Some((y_bin, phi_bin)) = self.binning.bin_pair(delta_y, delta_phi) {
                        hist.increment(y_bin, phi_bin);
                    }
                }
            }
        }
        Ok(())
    }
}
