use std::cell::RefCell;
use std::rc::{Rc, Weak};

use balance_nostd_internal::RandomSource;

use crate::Error;

/// A non-owning handle to a centrally owned random number generator.
///
/// The owner keeps the generator in an `Rc<RefCell<R>>`. The analysis never
/// extends the generator's lifetime; if the owner drops it while the
/// analysis still needs random numbers, the analysis fails.
pub struct RandomHandle<R> {
    inner: Weak<RefCell<R>>,
}

impl<R> Clone for RandomHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: RandomSource> RandomHandle<R> {
    pub fn new(owner: &Rc<RefCell<R>>) -> Self {
        Self {
            inner: Rc::downgrade(owner),
        }
    }

    /// `true` while the generator is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Run `f` with exclusive access to the generator
    ///
    /// # Panics
    /// If the generator is already mutably borrowed (this only happens if
    /// `f` itself accesses the generator through another handle).
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut R) -> T) -> Result<T, Error> {
        let rng = self.inner.upgrade().ok_or_else(Error::random_source_expired)?;
        let mut guard = rng.borrow_mut();
        Ok(f(&mut *guard))
    }
}
