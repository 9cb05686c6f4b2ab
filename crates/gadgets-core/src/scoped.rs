//! Traversal-scoped state with guaranteed restore.

use std::cell::Cell;
use std::rc::Rc;

/// A value that visitors set for the duration of a subtree.
///
/// [`ScopedValue::enter`] returns a [`Restore`] guard; dropping it puts the
/// previous value back, on normal exit and during unwinding alike.
///
/// ```
/// use gadgets_core::ScopedValue;
///
/// let in_sync = ScopedValue::new(false);
/// {
///     let _guard = in_sync.enter(true);
///     assert!(in_sync.get());
/// }
/// assert!(!in_sync.get());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopedValue<T: Copy>(Rc<Cell<T>>);

impl<T: Copy> ScopedValue<T> {
    /// Creates a value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// Overwrites the value without a guard.
    pub fn set(&self, value: T) {
        self.0.set(value);
    }

    /// Sets `value` until the returned guard is dropped.
    #[must_use = "the previous value is restored as soon as the guard is dropped"]
    pub fn enter(&self, value: T) -> Restore<T> {
        let previous = self.0.replace(value);
        Restore {
            cell: Rc::clone(&self.0),
            previous,
        }
    }
}

/// Guard returned by [`ScopedValue::enter`].
#[derive(Debug)]
pub struct Restore<T: Copy> {
    cell: Rc<Cell<T>>,
    previous: T,
}

impl<T: Copy> Drop for Restore<T> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn nested_entries_unwind_in_order() {
        let depth = ScopedValue::new(0);
        let outer = depth.enter(1);
        {
            let _inner = depth.enter(2);
            assert_eq!(depth.get(), 2);
        }
        assert_eq!(depth.get(), 1);
        drop(outer);
        assert_eq!(depth.get(), 0);
    }

    #[test]
    fn restores_on_panic() {
        let flag = ScopedValue::new(false);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = flag.enter(true);
            panic!("visitor failed");
        }));
        assert!(result.is_err());
        assert!(!flag.get());
    }
}
