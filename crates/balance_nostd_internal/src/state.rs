use ndarray::{ArrayView2, ArrayViewMut2};

/// A mutable view of a single 2D pair-count histogram.
///
/// Axis 0 holds the Δy bins and axis 1 holds the Δφ bins.
///
/// # Note
/// There is some benefit to defining this even though it wraps ArrayViewMut2
/// since it helps contain all references to the ndarray package to a single
/// file.
pub struct HistogramViewMut<'a> {
    data: ArrayViewMut2<'a, f64>,
}

impl<'a> HistogramViewMut<'a> {
    pub fn from_array_view(array_view: ArrayViewMut2<'a, f64>) -> Self {
        Self { data: array_view }
    }

    pub fn n_rap_bins(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn n_phi_bins(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.n_rap_bins(), self.n_phi_bins()]
    }

    /// adds a single count to the specified bin. The indices are trusted.
    #[inline(always)]
    pub fn increment(&mut self, y_bin: usize, phi_bin: usize) {
        self.data[[y_bin, phi_bin]] += 1.0;
    }

    pub fn get(&self, y_bin: usize, phi_bin: usize) -> f64 {
        self.data[[y_bin, phi_bin]]
    }

    pub fn as_array_view(&self) -> ArrayView2<f64> {
        self.data.view()
    }
}
