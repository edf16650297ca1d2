#![forbid(unsafe_code)]

//! Thread-safe reference implementation of [`LifecycleOwner`].
//!
//! # Design
//!
//! [`LifecycleRegistry`] holds the current [`LifecycleState`] and the
//! registered observers behind one `Mutex`. A state change walks the state
//! order one step at a time; each step updates the state, snapshots the
//! observer list, releases the lock, and then notifies observers in
//! registration order.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order.
//! 2. No lock is held while an observer runs, so observers may add or remove
//!    registrations (including their own) from inside `on_event`.
//! 3. An observer removed earlier in the same dispatch is not notified.
//! 4. Observers added during a dispatch first hear the next event.
//! 5. `Destroyed` is terminal.
//!
//! # Failure Modes
//!
//! - **Invalid transition**: leaving `Destroyed`, or moving back to
//!   `Initialized` once created, returns [`LifecycleError::InvalidTransition`]
//!   and leaves the state untouched.
//! - **Re-entrant transition**: an observer that drives the registry to a new
//!   state from inside `on_event` runs that transition to completion before
//!   the outer dispatch continues. Later observers of the outer event then
//!   see the events out of order; hosts should not do this.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::lifecycle::{LifecycleEvent, LifecycleState};
use crate::observer::{LifecycleObserver, LifecycleOwner, ObserverId};

/// Errors from driving a [`LifecycleRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested state cannot be reached from the current one.
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "invalid lifecycle transition from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

struct Registration {
    id: ObserverId,
    observer: Arc<dyn LifecycleObserver>,
}

struct RegistryInner {
    state: LifecycleState,
    observers: Vec<Registration>,
    next_id: u64,
}

impl RegistryInner {
    fn is_registered(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|r| r.id == id)
    }
}

/// A lifecycle owner that can be driven explicitly.
pub struct LifecycleRegistry {
    inner: Mutex<RegistryInner>,
}

impl Default for LifecycleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LifecycleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("LifecycleRegistry")
            .field("state", &inner.state)
            .field("observer_count", &inner.observers.len())
            .finish()
    }
}

impl LifecycleRegistry {
    /// Create a registry in the `Initialized` state with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                state: LifecycleState::Initialized,
                observers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Returns true if `id` is currently registered.
    #[must_use]
    pub fn is_registered(&self, id: ObserverId) -> bool {
        self.lock().is_registered(id)
    }

    /// Dispatch `event`, moving to its target state.
    ///
    /// Intermediate events are dispatched too: destroying a resumed owner
    /// emits `Pause`, `Stop`, `Destroy` in that order.
    pub fn handle_lifecycle_event(&self, event: LifecycleEvent) -> Result<(), LifecycleError> {
        self.move_to(event.target_state())
    }

    /// Move to `state`, dispatching every event on the way.
    pub fn mark_state(&self, state: LifecycleState) -> Result<(), LifecycleError> {
        self.move_to(state)
    }

    fn move_to(&self, target: LifecycleState) -> Result<(), LifecycleError> {
        {
            let inner = self.lock();
            let from = inner.state;
            let leaving_destroyed = from == LifecycleState::Destroyed && target != from;
            let back_to_initialized = target == LifecycleState::Initialized
                && from.is_at_least(LifecycleState::Created);
            if leaving_destroyed || back_to_initialized {
                return Err(LifecycleError::InvalidTransition { from, to: target });
            }
        }

        loop {
            let (event, snapshot) = {
                let mut inner = self.lock();
                let current = inner.state;
                if current == target {
                    return Ok(());
                }
                let step = if target > current {
                    LifecycleEvent::up_from(current)
                } else {
                    LifecycleEvent::down_from(current)
                };
                let Some(event) = step else {
                    // Initialized -> Destroyed: nothing was ever created.
                    inner.state = target;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(from = %current, to = %target, "lifecycle jump without event");
                    return Ok(());
                };
                inner.state = event.target_state();
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    %event,
                    from = %current,
                    to = %inner.state,
                    observers = inner.observers.len(),
                    "lifecycle transition"
                );
                let snapshot: Vec<(ObserverId, Arc<dyn LifecycleObserver>)> = inner
                    .observers
                    .iter()
                    .map(|r| (r.id, Arc::clone(&r.observer)))
                    .collect();
                (event, snapshot)
            };

            for (id, observer) in snapshot {
                if self.is_registered(id) {
                    observer.on_event(self, id, event);
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().expect("lifecycle registry lock poisoned")
    }
}

impl LifecycleOwner for LifecycleRegistry {
    fn add_observer(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId {
        let mut inner = self.lock();
        let id = ObserverId::from_raw(inner.next_id);
        inner.next_id += 1;
        inner.observers.push(Registration { id, observer });
        id
    }

    fn remove_observer(&self, id: ObserverId) -> bool {
        let mut inner = self.lock();
        let before = inner.observers.len();
        inner.observers.retain(|r| r.id != id);
        inner.observers.len() != before
    }

    fn current_state(&self) -> LifecycleState {
        self.lock().state
    }
}
