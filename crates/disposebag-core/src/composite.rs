#![forbid(unsafe_code)]

//! A thread-safe container of disposables that disposes them together.
//!
//! # Invariants
//!
//! 1. `disposed` goes false → true once and never back.
//! 2. Once disposed, the member list is empty; a later `add` disposes the
//!    incoming resource instead of holding it.
//! 3. Member disposal always runs after the internal lock is released, so a
//!    member may re-enter this container (or any other) while disposing.
//!
//! # Performance
//!
//! | Operation  | Complexity |
//! |------------|------------|
//! | `add`      | O(1) amortized |
//! | `remove` / `delete` | O(n) |
//! | `clear` / `dispose` | O(n) |

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::disposable::{Disposable, DisposableContainer, DisposableRef, same_resource};

#[derive(Default)]
struct CompositeInner {
    members: Vec<DisposableRef>,
    disposed: bool,
}

/// Disposes every member when disposed itself.
///
/// Duplicates are allowed; `remove`/`delete` act on the first match.
#[derive(Default)]
pub struct CompositeDisposable {
    inner: Mutex<CompositeInner>,
}

impl fmt::Debug for CompositeDisposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("CompositeDisposable")
            .field("len", &inner.members.len())
            .field("disposed", &inner.disposed)
            .finish()
    }
}

impl CompositeDisposable {
    /// An empty, active composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composite pre-filled with `resources`, in iteration order.
    #[must_use]
    pub fn with_resources(resources: impl IntoIterator<Item = DisposableRef>) -> Self {
        Self {
            inner: Mutex::new(CompositeInner {
                members: resources.into_iter().collect(),
                disposed: false,
            }),
        }
    }

    /// Add every resource. Returns `false` (after disposing all of them) if
    /// the composite is already disposed.
    pub fn add_all(&self, resources: impl IntoIterator<Item = DisposableRef>) -> bool {
        let rejected: Vec<DisposableRef> = {
            let mut inner = self.lock();
            if !inner.disposed {
                inner.members.extend(resources);
                return true;
            }
            resources.into_iter().collect()
        };
        for resource in rejected {
            resource.dispose();
        }
        false
    }

    /// Dispose and drop every member, leaving the composite usable.
    pub fn clear(&self) {
        let members = {
            let mut inner = self.lock();
            std::mem::take(&mut inner.members)
        };
        for member in members {
            member.dispose();
        }
    }

    /// Number of members currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().members.len()
    }

    /// Returns true if no members are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().members.is_empty()
    }

    /// Returns true if `resource` is currently held.
    #[must_use]
    pub fn contains(&self, resource: &DisposableRef) -> bool {
        self.lock()
            .members
            .iter()
            .any(|m| same_resource(m, resource))
    }

    fn take_member(&self, resource: &DisposableRef) -> Option<DisposableRef> {
        let mut inner = self.lock();
        let index = inner
            .members
            .iter()
            .position(|m| same_resource(m, resource))?;
        Some(inner.members.swap_remove(index))
    }

    fn lock(&self) -> MutexGuard<'_, CompositeInner> {
        self.inner.lock().expect("composite disposable lock poisoned")
    }
}

impl DisposableContainer for CompositeDisposable {
    fn add(&self, resource: DisposableRef) -> bool {
        {
            let mut inner = self.lock();
            if !inner.disposed {
                inner.members.push(resource);
                return true;
            }
        }
        resource.dispose();
        false
    }

    fn remove(&self, resource: &DisposableRef) -> bool {
        match self.take_member(resource) {
            Some(member) => {
                member.dispose();
                true
            }
            None => false,
        }
    }

    fn delete(&self, resource: &DisposableRef) -> bool {
        self.take_member(resource).is_some()
    }
}

impl Disposable for CompositeDisposable {
    fn dispose(&self) {
        let members = {
            let mut inner = self.lock();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            std::mem::take(&mut inner.members)
        };
        for member in members {
            member.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.lock().disposed
    }
}
