#![forbid(unsafe_code)]

//! Observer registration on a lifecycle owner.
//!
//! Registration hands back an [`ObserverId`]. Removal goes through that id,
//! never through observer identity, so the same observer value may be
//! registered twice and removed independently.

use std::fmt;
use std::sync::Arc;

use crate::lifecycle::{LifecycleEvent, LifecycleState};

/// Opaque handle for one observer registration on one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Wrap a raw id. Owners are responsible for keeping ids unique.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Receives lifecycle events from an owner.
///
/// Callbacks run synchronously on whatever thread the owner dispatches from.
/// The owner must not hold any internal lock while calling `on_event`, so an
/// observer may call back into the owner, including removing itself through
/// `id`.
pub trait LifecycleObserver: Send + Sync {
    /// Called once per transition while the observer is registered.
    fn on_event(&self, owner: &dyn LifecycleOwner, id: ObserverId, event: LifecycleEvent);
}

/// An object with a lifecycle that notifies observers of its transitions.
pub trait LifecycleOwner: Send + Sync {
    /// Register `observer` and return its registration handle.
    fn add_observer(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId;

    /// Remove a registration. Returns `false` if `id` was not registered.
    fn remove_observer(&self, id: ObserverId) -> bool;

    /// The owner's current state.
    fn current_state(&self) -> LifecycleState;
}

impl<T: LifecycleOwner + ?Sized> LifecycleOwner for Arc<T> {
    fn add_observer(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId {
        (**self).add_observer(observer)
    }

    fn remove_observer(&self, id: ObserverId) -> bool {
        (**self).remove_observer(id)
    }

    fn current_state(&self) -> LifecycleState {
        (**self).current_state()
    }
}

impl<F> LifecycleObserver for F
where
    F: Fn(&dyn LifecycleOwner, ObserverId, LifecycleEvent) + Send + Sync,
{
    fn on_event(&self, owner: &dyn LifecycleOwner, id: ObserverId, event: LifecycleEvent) {
        self(owner, id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_id_display() {
        let id = ObserverId::from_raw(7);
        assert_eq!(id, ObserverId::from_raw(7));
        assert_eq!(id.to_string(), "observer#7");
    }

    #[test]
    fn observer_ids_order_by_raw_value() {
        assert!(ObserverId::from_raw(1) < ObserverId::from_raw(2));
    }
}
