use rand::Rng;

/// The narrow interface through which the pair binner draws random numbers.
///
/// Every `rand::Rng` implements this trait. Test doubles (or generators from
/// other ecosystems) can implement it directly.
pub trait RandomSource {
    /// returns an integer drawn uniformly from `[0, n)`. `n` must be positive.
    fn uniform_int(&mut self, n: usize) -> usize;

    /// returns a real drawn uniformly from `[0, 1)`
    fn uniform_real(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform_int(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }

    #[inline]
    fn uniform_real(&mut self) -> f64 {
        self.random::<f64>()
    }
}
