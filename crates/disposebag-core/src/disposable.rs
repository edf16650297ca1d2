#![forbid(unsafe_code)]

//! Cancelable resources.
//!
//! A [`Disposable`] is any handle for ongoing work that can be told to stop
//! and asked whether it has stopped. Disposal must be idempotent: callers
//! (lifecycle events, manual cleanup, containers) may race or repeat it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A cancelable resource.
pub trait Disposable: Send + Sync {
    /// Stop the resource. Calling this more than once has no further effect.
    fn dispose(&self);

    /// Returns true once [`dispose`](Self::dispose) has taken effect.
    fn is_disposed(&self) -> bool;
}

/// Shared handle to a type-erased disposable.
pub type DisposableRef = Arc<dyn Disposable>;

impl<T: Disposable + ?Sized> Disposable for Arc<T> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

/// Returns true if `a` and `b` point at the same allocation.
///
/// Compares data pointers only; two `Arc<dyn Disposable>` built from the
/// same `Arc<T>` may carry different vtable pointers.
#[must_use]
pub fn same_resource(a: &DisposableRef, b: &DisposableRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A container of disposables.
pub trait DisposableContainer {
    /// Add a resource. Returns `false` (after disposing it) if the container
    /// is already disposed.
    fn add(&self, resource: DisposableRef) -> bool;

    /// Remove and dispose a resource. Returns `false` if it was not held.
    fn remove(&self, resource: &DisposableRef) -> bool;

    /// Remove a resource without disposing it. Returns `false` if it was not
    /// held.
    fn delete(&self, resource: &DisposableRef) -> bool;
}

// ---------------------------------------------------------------------------
// BooleanDisposable
// ---------------------------------------------------------------------------

/// A disposable that only records whether it was disposed.
///
/// Useful as a cancellation flag polled by cooperative work.
#[derive(Debug, Default)]
pub struct BooleanDisposable {
    disposed: AtomicBool,
}

impl BooleanDisposable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            disposed: AtomicBool::new(false),
        }
    }
}

impl Disposable for BooleanDisposable {
    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// ActionDisposable
// ---------------------------------------------------------------------------

type Action = Box<dyn FnOnce() + Send>;

/// A disposable that runs a closure exactly once, on first disposal.
pub struct ActionDisposable {
    action: Mutex<Option<Action>>,
    disposed: AtomicBool,
}

impl ActionDisposable {
    #[must_use]
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            action: Mutex::new(Some(Box::new(action))),
            disposed: AtomicBool::new(false),
        }
    }
}

impl fmt::Debug for ActionDisposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDisposable")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl Disposable for ActionDisposable {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let action = self
            .action
            .lock()
            .expect("action disposable lock poisoned")
            .take();
        // Run outside the lock; the action may dispose other resources.
        if let Some(action) = action {
            action();
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

/// Small constructors for common disposables.
pub mod disposables {
    use super::{ActionDisposable, BooleanDisposable, Disposable, DisposableRef};
    use std::sync::Arc;

    /// A disposable that runs `action` once when disposed.
    #[must_use]
    pub fn from_fn(action: impl FnOnce() + Send + 'static) -> DisposableRef {
        Arc::new(ActionDisposable::new(action))
    }

    /// A fresh, not-yet-disposed flag.
    #[must_use]
    pub fn empty() -> DisposableRef {
        Arc::new(BooleanDisposable::new())
    }

    /// A flag that is already disposed.
    #[must_use]
    pub fn disposed() -> DisposableRef {
        let d = BooleanDisposable::new();
        d.dispose();
        Arc::new(d)
    }
}
