use ndarray::{Array2, ArrayView2};

use balance_nostd_internal::HistogramViewMut;

use crate::Error;

/// Identifies one of the 8 pair-count histograms.
///
/// The first 4 channels are filled from same-event pairs, the last 4 from
/// mixed-event pairs. "Bar" denotes the charge-conjugate role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Ab,
    AbarBbar,
    AbBar,
    AbarB,
    MixedAb,
    MixedAbarBbar,
    MixedAbBar,
    MixedAbarB,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::Ab,
        Channel::AbarBbar,
        Channel::AbBar,
        Channel::AbarB,
        Channel::MixedAb,
        Channel::MixedAbarBbar,
        Channel::MixedAbBar,
        Channel::MixedAbarB,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Ab => "C_ab",
            Channel::AbarBbar => "C_abarbbar",
            Channel::AbBar => "C_abbar",
            Channel::AbarB => "C_abarb",
            Channel::MixedAb => "C_mixed_ab",
            Channel::MixedAbarBbar => "C_mixed_abarbbar",
            Channel::MixedAbBar => "C_mixed_abbar",
            Channel::MixedAbarB => "C_mixed_abarb",
        }
    }

    pub fn is_mixed(self) -> bool {
        self.index() >= 4
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the 8 (Δy, Δφ) pair-count histograms of an analysis.
///
/// The counts accumulate over every processed chunk; nothing resets them.
#[derive(Clone, Debug)]
pub struct HistogramStore {
    grids: [Array2<f64>; 8],
}

impl HistogramStore {
    /// allocate 8 zero-initialized grids with shape `[n_rap_bins, n_phi_bins]`
    pub fn new(n_rap_bins: usize, n_phi_bins: usize) -> Result<Self, Error> {
        if n_rap_bins == 0 || n_phi_bins == 0 {
            return Err(Error::histogram_shape(n_rap_bins, n_phi_bins));
        }
        Ok(Self {
            grids: std::array::from_fn(|_| Array2::zeros((n_rap_bins, n_phi_bins))),
        })
    }

    pub fn n_rap_bins(&self) -> usize {
        self.grids[0].shape()[0]
    }

    pub fn n_phi_bins(&self) -> usize {
        self.grids[0].shape()[1]
    }

    /// adds a single count. The indices are trusted.
    pub fn increment(&mut self, channel: Channel, y_bin: usize, phi_bin: usize) {
        self.grids[channel.index()][[y_bin, phi_bin]] += 1.0;
    }

    pub fn view(&self, channel: Channel) -> ArrayView2<'_, f64> {
        self.grids[channel.index()].view()
    }

    pub fn view_mut(&mut self, channel: Channel) -> HistogramViewMut<'_> {
        HistogramViewMut::from_array_view(self.grids[channel.index()].view_mut())
    }

    /// the sum over every bin of a channel
    pub fn total(&self, channel: Channel) -> f64 {
        self.grids[channel.index()].sum()
    }
}
