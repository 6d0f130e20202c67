//! Callback properties carried by interactive cells.
//!
//! Interactions report their results through the cell that was clicked, not
//! through a return value: a link cell carries the closure to call with the
//! clicked URL, a boolean cell carries the closure to call with the toggled
//! value. Callbacks are not data: serde skips them and equality is identity.

use std::fmt;
use std::sync::Arc;

/// A shareable callback taking one argument.
pub struct CellCallback<T>(Arc<dyn Fn(T) + Send + Sync>);

impl<T> CellCallback<T> {
    pub fn new(f: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, value: T) {
        (self.0)(value)
    }
}

impl<T> Clone for CellCallback<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for CellCallback<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> fmt::Debug for CellCallback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellCallback({:p})", Arc::as_ptr(&self.0))
    }
}
