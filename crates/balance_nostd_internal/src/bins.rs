//! Implements types to represent "bin edges" along the two pair-separation
//! axes. The [`BinEdges`] trait provides a common interface that is
//! implemented by [`RegularBinEdges`] (used for Δy) and [`PeriodicBinEdges`]
//! (used for Δφ). [`DeltaBinning`] packages the two together.

use core::f64::consts::PI;

/// Super simple. This can be expanded as needed.
pub trait BinEdges {
    /// Calculate the bin index for a given value. Values which are equal to
    /// boundary values are considered part of the higher bin, i.e. intervals
    /// do not include the right edge.
    fn bin_index(&self, value: f64) -> Option<usize>;

    fn n_bins(&self) -> usize;
}

/// Regular bins with uniform spacing
#[derive(Clone, Debug)]
pub struct RegularBinEdges {
    min: f64,
    max: f64,
    bin_size: f64,
    n_bins: usize,
}

impl RegularBinEdges {
    /// Note that we initialize with num_bins rather than bin_size
    pub fn new(min: f64, max: f64, n_bins: usize) -> Result<Self, &'static str> {
        if n_bins == 0 {
            Err("Number of bins must be greater than zero")
        } else if !min.is_finite() || !max.is_finite() {
            Err("Min and max values must be finite")
        } else if max <= min {
            Err("Maximum value must be greater than minimum value")
        } else {
            Ok(Self {
                min,
                max,
                bin_size: (max - min) / n_bins as f64,
                n_bins,
            })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// the midpoint of the `i`th bin
    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_size
    }
}

impl BinEdges for RegularBinEdges {
    fn bin_index(&self, value: f64) -> Option<usize> {
        // written so that NaN is also rejected
        if !(value >= self.min) {
            return None;
        }

        // this cast handles the truncation. We compare against n_bins rather
        // than max since rounding can push a value just below max into bin
        // n_bins
        let index = ((value - self.min) / self.bin_size) as usize;
        (index < self.n_bins).then_some(index)
    }

    fn n_bins(&self) -> usize {
        self.n_bins
    }
}

/// Regular bins that tile a full circle, starting at `min`.
///
/// Every finite angle maps to a bin: the index wraps around modulo
/// `n_bins`, so `min - bin_size` lands in the last bin.
#[derive(Clone, Debug)]
pub struct PeriodicBinEdges {
    min: f64,
    bin_size: f64,
    n_bins: usize,
}

impl PeriodicBinEdges {
    pub fn new(min: f64, n_bins: usize) -> Result<Self, &'static str> {
        if n_bins == 0 {
            Err("Number of bins must be greater than zero")
        } else if !min.is_finite() {
            Err("Min value must be finite")
        } else {
            Ok(Self {
                min,
                bin_size: 2.0 * PI / n_bins as f64,
                n_bins,
            })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// the lower edge of the `i`th bin
    pub fn left_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_size
    }

    /// the wrapped bin index, always in `[0, n_bins)`
    pub fn wrapped_index(&self, value: f64) -> usize {
        // NOTE: f64::floor isn't available in no_std crates. We emulate it
        //       with a truncating cast (a cast of NaN produces 0)
        let scaled = (value - self.min) / self.bin_size;
        let mut index = scaled as i64;
        // the cast saturates for huge (or infinite) values
        if (index as f64) > scaled {
            index = index.saturating_sub(1);
        }
        index.rem_euclid(self.n_bins as i64) as usize
    }
}

impl BinEdges for PeriodicBinEdges {
    fn bin_index(&self, value: f64) -> Option<usize> {
        Some(self.wrapped_index(value))
    }

    fn n_bins(&self) -> usize {
        self.n_bins
    }
}

/// The number of Δφ bins used for every analysis
pub const N_PHI_BINS: usize = 20;

/// The lower edge of the first Δφ bin
pub const PHI_MIN: f64 = -PI / 2.0;

/// The 2D (Δy, Δφ) binning shared by every histogram channel
#[derive(Clone, Debug)]
pub struct DeltaBinning {
    rap: RegularBinEdges,
    phi: PeriodicBinEdges,
}

impl DeltaBinning {
    pub fn new(rap: RegularBinEdges, phi: PeriodicBinEdges) -> Self {
        Self { rap, phi }
    }

    /// `n_rap_bins` uniform Δy bins covering `[-rap_max, rap_max)` and the
    /// standard [`N_PHI_BINS`] Δφ bins starting at [`PHI_MIN`]
    pub fn symmetric(rap_max: f64, n_rap_bins: usize) -> Result<Self, &'static str> {
        Ok(Self {
            rap: RegularBinEdges::new(-rap_max, rap_max, n_rap_bins)?,
            phi: PeriodicBinEdges::new(PHI_MIN, N_PHI_BINS)?,
        })
    }

    pub fn rap(&self) -> &RegularBinEdges {
        &self.rap
    }

    pub fn phi(&self) -> &PeriodicBinEdges {
        &self.phi
    }

    /// the histogram shape, `[n_rap_bins, n_phi_bins]`
    pub fn shape(&self) -> [usize; 2] {
        [self.rap.n_bins(), self.phi.n_bins()]
    }

    /// Map a pair separation to `(y_bin, phi_bin)`. Returns None when the
    /// rapidity difference falls outside of the Δy range.
    #[inline(always)]
    pub fn bin_pair(&self, delta_y: f64, delta_phi: f64) -> Option<(usize, usize)> {
        let y_bin = self.rap.bin_index(delta_y)?;
        Some((y_bin, self.phi.wrapped_index(delta_phi)))
    }
}
