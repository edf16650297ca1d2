#![forbid(unsafe_code)]

//! A lifecycle owner for tests.

use std::sync::Arc;

use disposebag_core::{
    LifecycleEvent, LifecycleObserver, LifecycleOwner, LifecycleRegistry, LifecycleState,
    ObserverId,
};

/// Wraps a [`LifecycleRegistry`] with panicking transition helpers.
///
/// Invalid transitions are test bugs, so the helpers panic instead of
/// returning errors.
#[derive(Debug, Default)]
pub struct TestLifecycleOwner {
    registry: LifecycleRegistry,
}

impl TestLifecycleOwner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new owner already moved to `state`, wrapped for sharing.
    #[must_use]
    pub fn shared_in(state: LifecycleState) -> Arc<Self> {
        let owner = Self::new();
        owner.mark_state(state);
        Arc::new(owner)
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &LifecycleRegistry {
        &self.registry
    }

    /// Move to `state`, dispatching every event on the way.
    pub fn mark_state(&self, state: LifecycleState) {
        self.registry
            .mark_state(state)
            .unwrap_or_else(|err| panic!("mark_state({state}): {err}"));
    }

    /// Dispatch `event`.
    pub fn perform_event(&self, event: LifecycleEvent) {
        self.registry
            .handle_lifecycle_event(event)
            .unwrap_or_else(|err| panic!("perform_event({event}): {err}"));
    }

    pub fn perform_pause(&self) {
        self.perform_event(LifecycleEvent::Pause);
    }

    pub fn perform_stop(&self) {
        self.perform_event(LifecycleEvent::Stop);
    }

    pub fn perform_destroy(&self) {
        self.perform_event(LifecycleEvent::Destroy);
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.observer_count()
    }
}

impl LifecycleOwner for TestLifecycleOwner {
    fn add_observer(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverId {
        self.registry.add_observer(observer)
    }

    fn remove_observer(&self, id: ObserverId) -> bool {
        self.registry.remove_observer(id)
    }

    fn current_state(&self) -> LifecycleState {
        self.registry.current_state()
    }
}
