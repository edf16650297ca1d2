#![forbid(unsafe_code)]

//! Binding single resources to a lifecycle without a bag.
//!
//! [`attach`] registers a private observer that disposes one resource on one
//! event and then unregisters itself. Nothing is handed back to the caller:
//! the resource's own [`Disposable::is_disposed`] is the only signal.
//!
//! [`DisposableExt`] offers the same operations, plus
//! [`disposed_by`](DisposableExt::disposed_by) for adding to a bag, as
//! methods on any `Arc` of a concrete disposable. [`DisposableRefExt`] does
//! the same for an already type-erased [`DisposableRef`].

use std::sync::Arc;

use disposebag_core::{
    Disposable, DisposableRef, DisposeEvent, LifecycleEvent, LifecycleObserver, LifecycleOwner,
    LifecycleState, ObserverId,
};
use tracing::{debug, trace};

use crate::bag::DisposeBag;
use crate::plugins;

struct AttachedResource {
    resource: DisposableRef,
    event: DisposeEvent,
}

impl LifecycleObserver for AttachedResource {
    fn on_event(&self, owner: &dyn LifecycleOwner, id: ObserverId, event: LifecycleEvent) {
        if !self.event.matches(event) {
            return;
        }
        self.resource.dispose();
        owner.remove_observer(id);
        debug!(%id, %event, "attached resource disposed");
    }
}

/// Dispose `resource` when `owner` emits `event`.
///
/// If the owner is already destroyed the resource is disposed right away,
/// since no further event will ever arrive.
pub fn attach<O>(resource: DisposableRef, owner: &O, event: DisposeEvent)
where
    O: LifecycleOwner + ?Sized,
{
    if owner.current_state() == LifecycleState::Destroyed {
        debug!(%event, "owner already destroyed; disposing attached resource");
        resource.dispose();
        return;
    }
    let attached = Arc::new(AttachedResource { resource, event });
    let id = owner.add_observer(attached.clone());
    // The owner may have been destroyed between the check and registration.
    if owner.current_state() == LifecycleState::Destroyed {
        owner.remove_observer(id);
        attached.resource.dispose();
        debug!(%id, %event, "owner destroyed during attach; disposing attached resource");
        return;
    }
    trace!(%id, %event, "resource attached");
}

/// Dispose `resource` when `owner` emits the current default event.
pub fn attach_default<O>(resource: DisposableRef, owner: &O)
where
    O: LifecycleOwner + ?Sized,
{
    attach(resource, owner, plugins::default_dispose_event());
}

/// Lifecycle-binding methods for shared disposables.
///
/// Implemented for every sized [`Disposable`]; call on an `Arc` of it. For an
/// already type-erased [`DisposableRef`], see [`DisposableRefExt`].
pub trait DisposableExt: Disposable + Sized + 'static {
    /// Add to `bag`. Same as `bag.add(self)`.
    fn disposed_by(self: Arc<Self>, bag: &DisposeBag) -> bool {
        bag.add(self)
    }

    /// Dispose when `owner` emits the current default event.
    fn disposed_with<O>(self: Arc<Self>, owner: &O)
    where
        O: LifecycleOwner + ?Sized,
    {
        attach_default(self, owner);
    }

    /// Dispose when `owner` emits `event`.
    fn disposed_with_event<O>(self: Arc<Self>, owner: &O, event: DisposeEvent)
    where
        O: LifecycleOwner + ?Sized,
    {
        attach(self, owner, event);
    }
}

impl<D: Disposable + 'static> DisposableExt for D {}

/// [`DisposableExt`] for a type-erased [`DisposableRef`].
pub trait DisposableRefExt {
    /// Add to `bag`. Same as `bag.add(self)`.
    fn disposed_by(self, bag: &DisposeBag) -> bool;

    /// Dispose when `owner` emits the current default event.
    fn disposed_with<O>(self, owner: &O)
    where
        O: LifecycleOwner + ?Sized;

    /// Dispose when `owner` emits `event`.
    fn disposed_with_event<O>(self, owner: &O, event: DisposeEvent)
    where
        O: LifecycleOwner + ?Sized;
}

impl DisposableRefExt for DisposableRef {
    fn disposed_by(self, bag: &DisposeBag) -> bool {
        bag.add(self)
    }

    fn disposed_with<O>(self, owner: &O)
    where
        O: LifecycleOwner + ?Sized,
    {
        attach_default(self, owner);
    }

    fn disposed_with_event<O>(self, owner: &O, event: DisposeEvent)
    where
        O: LifecycleOwner + ?Sized,
    {
        attach(self, owner, event);
    }
}
