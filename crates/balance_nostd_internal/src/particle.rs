/// Absolute tolerance used when deciding whether 2 records describe the same
/// particle
pub const SAME_PARTICLE_TOL: f64 = 1e-15;

/// A snapshot of a single sampled particle.
///
/// The kinematic members (`pt`, `phi_p`, `rap_y`) are used for cuts and
/// binning. The energy, momentum components and emission coordinates are
/// only used to detect when 2 records refer to the same particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleRecord {
    /// Monte-Carlo species code
    pub monval: i32,
    /// transverse momentum
    pub pt: f64,
    /// azimuthal angle of the momentum
    pub phi_p: f64,
    /// rapidity
    pub rap_y: f64,
    pub e: f64,
    pub px: f64,
    pub py: f64,
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

impl ParticleRecord {
    /// returns whether `self` and `other` share a species code and agree on
    /// energy, transverse momentum components and emission coordinates
    /// within [`SAME_PARTICLE_TOL`]
    pub fn is_same_particle(&self, other: &ParticleRecord) -> bool {
        // NOTE: written without f64::abs to support older no_std toolchains
        let close = |lhs: f64, rhs: f64| {
            let diff = lhs - rhs;
            diff < SAME_PARTICLE_TOL && -diff < SAME_PARTICLE_TOL
        };
        self.monval == other.monval
            && close(self.e, other.e)
            && close(self.px, other.px)
            && close(self.py, other.py)
            && close(self.t, other.t)
            && close(self.x, other.x)
            && close(self.y, other.y)
    }
}

/// Transverse momentum window. Both edges are inclusive.
#[derive(Clone, Copy, Debug)]
pub struct PtCut {
    min: f64,
    max: f64,
}

impl PtCut {
    pub fn new(min: f64, max: f64) -> Result<Self, &'static str> {
        if min.is_nan() || max.is_nan() {
            Err("the pT window edges can't be NaN")
        } else if max < min {
            Err("the upper edge of the pT window can't be smaller than the lower edge")
        } else {
            Ok(Self { min, max })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline(always)]
    pub fn accepts(&self, particle: &ParticleRecord) -> bool {
        particle.pt >= self.min && particle.pt <= self.max
    }

    /// the number of particles, across all events, that pass the cut
    pub fn count_qualifying<E: AsRef<[ParticleRecord]>>(&self, events: &[E]) -> u64 {
        events
            .iter()
            .map(|event| event.as_ref().iter().filter(|p| self.accepts(p)).count() as u64)
            .sum()
    }
}
