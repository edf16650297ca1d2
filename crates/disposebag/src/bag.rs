#![forbid(unsafe_code)]

//! A bag of disposables bound to a lifecycle owner.
//!
//! # Design
//!
//! [`DisposeBag`] wraps a [`CompositeDisposable`] and registers itself as an
//! observer of its owner. When the owner emits the bag's target event, the
//! bag removes its observer and disposes every member. Manual
//! [`DisposeBag::dispose`] does the same.
//!
//! The owner is held weakly: a bag never keeps its owner alive. The owner's
//! registration holds the bag strongly, so a bag whose handles were all
//! dropped still disposes its members when the event arrives.
//!
//! # Invariants
//!
//! 1. `Active → Disposed` happens once, on the first of the target event or
//!    a manual `dispose()`. There is no way back.
//! 2. After disposal the member list is empty, and `add` disposes the
//!    incoming resource and returns `false`.
//! 3. The bag observes its owner from construction until disposal, and never
//!    after.
//! 4. Events other than the target are ignored.
//! 5. Disposal triggered by an event completes before the owner's dispatch
//!    returns.
//!
//! # Failure Modes
//!
//! - **Owner already destroyed**: `Destroyed` is terminal, so no event can
//!   ever reach the bag. Such a bag is disposed as soon as it is built.
//! - **Owner dropped**: a bag built through [`DisposeBag::from_weak`] fails
//!   with [`BagError::OwnerDropped`].

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use disposebag_core::{
    CompositeDisposable, Disposable, DisposableContainer, DisposableRef, DisposeEvent,
    LifecycleEvent, LifecycleObserver, LifecycleOwner, LifecycleState, ObserverId,
};
use tracing::{debug, trace};

use crate::error::BagError;
use crate::plugins;

/// State shared between bag handles and the owner's registration.
struct BagShared {
    members: CompositeDisposable,
    target_event: DisposeEvent,
    owner: Weak<dyn LifecycleOwner>,
    registration: OnceLock<ObserverId>,
}

impl BagShared {
    fn dispose(&self) {
        if self.members.is_disposed() {
            return;
        }
        if let Some(id) = self.registration.get()
            && let Some(owner) = self.owner.upgrade()
        {
            owner.remove_observer(*id);
        }
        self.dispose_members("manual");
    }

    fn dispose_members(&self, trigger: &'static str) {
        let count = self.members.len();
        self.members.dispose();
        debug!(
            target_event = %self.target_event,
            trigger,
            disposed = count,
            "dispose bag disposed"
        );
    }
}

impl LifecycleObserver for BagShared {
    fn on_event(&self, owner: &dyn LifecycleOwner, id: ObserverId, event: LifecycleEvent) {
        if !self.target_event.matches(event) {
            return;
        }
        owner.remove_observer(id);
        if !self.members.is_disposed() {
            self.dispose_members("lifecycle");
        }
    }
}

/// A container of disposables that disposes itself on a lifecycle event.
///
/// Cloning a `DisposeBag` creates a new handle to the **same** bag.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use disposebag::{DisposeBag, DisposeEvent, LifecycleEvent, LifecycleRegistry, LifecycleState};
/// use disposebag::{Disposable, disposables};
///
/// let owner = Arc::new(LifecycleRegistry::new());
/// owner.mark_state(LifecycleState::Started).unwrap();
///
/// let bag = DisposeBag::with_event(&owner, DisposeEvent::Stop);
/// let work = disposables::empty();
/// bag.add(work.clone());
///
/// owner.handle_lifecycle_event(LifecycleEvent::Stop).unwrap();
/// assert!(work.is_disposed());
/// assert!(bag.is_disposed());
/// ```
#[derive(Clone)]
pub struct DisposeBag {
    shared: Arc<BagShared>,
}

impl fmt::Debug for DisposeBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposeBag")
            .field("target_event", &self.shared.target_event)
            .field("len", &self.shared.members.len())
            .field("disposed", &self.shared.members.is_disposed())
            .field("registration", &self.shared.registration.get())
            .finish()
    }
}

impl DisposeBag {
    /// A bag that disposes on the current default event.
    #[must_use]
    pub fn new<O: LifecycleOwner + 'static>(owner: &Arc<O>) -> Self {
        Self::builder(owner).build()
    }

    /// A bag that disposes on `event`.
    #[must_use]
    pub fn with_event<O: LifecycleOwner + 'static>(owner: &Arc<O>, event: DisposeEvent) -> Self {
        Self::builder(owner).event(event).build()
    }

    /// A bag holding `resources` that disposes on the current default event.
    #[must_use]
    pub fn with_resources<O: LifecycleOwner + 'static>(
        resources: impl IntoIterator<Item = DisposableRef>,
        owner: &Arc<O>,
    ) -> Self {
        Self::builder(owner).resources(resources).build()
    }

    /// A bag holding `resources` that disposes on `event`.
    #[must_use]
    pub fn with_resources_and_event<O: LifecycleOwner + 'static>(
        resources: impl IntoIterator<Item = DisposableRef>,
        owner: &Arc<O>,
        event: DisposeEvent,
    ) -> Self {
        Self::builder(owner)
            .resources(resources)
            .event(event)
            .build()
    }

    /// Start building a bag bound to `owner`.
    #[must_use]
    pub fn builder<O: LifecycleOwner + 'static>(owner: &Arc<O>) -> DisposeBagBuilder {
        let owner: Arc<dyn LifecycleOwner> = owner.clone();
        DisposeBagBuilder {
            owner,
            event: None,
            resources: Vec::new(),
        }
    }

    /// Bind to an owner known only by a weak reference.
    ///
    /// `event = None` uses the current default event.
    pub fn from_weak(
        owner: &Weak<dyn LifecycleOwner>,
        event: Option<DisposeEvent>,
    ) -> Result<Self, BagError> {
        let owner = owner.upgrade().ok_or(BagError::OwnerDropped)?;
        Ok(DisposeBagBuilder {
            owner,
            event,
            resources: Vec::new(),
        }
        .build())
    }

    fn bind(
        owner: Arc<dyn LifecycleOwner>,
        resources: Vec<DisposableRef>,
        target_event: DisposeEvent,
    ) -> Self {
        let shared = Arc::new(BagShared {
            members: CompositeDisposable::with_resources(resources),
            target_event,
            owner: Arc::downgrade(&owner),
            registration: OnceLock::new(),
        });

        if owner.current_state() == LifecycleState::Destroyed {
            shared.dispose_members("owner destroyed");
            return Self { shared };
        }

        let id = owner.add_observer(shared.clone());
        let _ = shared.registration.set(id);
        // A dispose() racing with registration may have missed the id, and a
        // destroy landing before registration never reaches the observer.
        let destroyed = owner.current_state() == LifecycleState::Destroyed;
        if destroyed || shared.members.is_disposed() {
            owner.remove_observer(id);
        }
        if destroyed && !shared.members.is_disposed() {
            shared.dispose_members("owner destroyed");
        }
        trace!(%id, %target_event, len = shared.members.len(), "dispose bag bound");
        Self { shared }
    }

    /// Add a resource.
    ///
    /// Returns `false` if the bag is already disposed; the resource is
    /// disposed immediately in that case.
    pub fn add(&self, resource: DisposableRef) -> bool {
        let added = self.shared.members.add(resource);
        if !added {
            trace!(target_event = %self.shared.target_event, "add to disposed bag");
        }
        added
    }

    /// Add every resource in `resources`.
    ///
    /// Returns `false` if the bag is already disposed; all of them are
    /// disposed immediately in that case.
    pub fn add_all(&self, resources: impl IntoIterator<Item = DisposableRef>) -> bool {
        self.shared.members.add_all(resources)
    }

    /// Dispose and remove `resource`. Returns `false` if it was not held.
    pub fn remove(&self, resource: &DisposableRef) -> bool {
        self.shared.members.remove(resource)
    }

    /// Remove `resource` without disposing it. Returns `false` if it was not
    /// held.
    pub fn delete(&self, resource: &DisposableRef) -> bool {
        self.shared.members.delete(resource)
    }

    /// Dispose and remove every member. The bag stays active and keeps
    /// observing its owner.
    pub fn clear(&self) {
        self.shared.members.clear();
    }

    /// Dispose every member, stop observing the owner, and refuse new
    /// members from now on. Safe to call any number of times.
    pub fn dispose(&self) {
        self.shared.dispose();
    }

    /// Returns true once the bag has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.members.is_disposed()
    }

    /// The event this bag disposes on.
    #[must_use]
    pub fn target_event(&self) -> DisposeEvent {
        self.shared.target_event
    }

    /// Number of members currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.members.len()
    }

    /// Returns true if no members are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.members.is_empty()
    }

    /// Returns true if `resource` is currently held.
    #[must_use]
    pub fn contains(&self, resource: &DisposableRef) -> bool {
        self.shared.members.contains(resource)
    }
}

impl Disposable for DisposeBag {
    fn dispose(&self) {
        DisposeBag::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        DisposeBag::is_disposed(self)
    }
}

impl DisposableContainer for DisposeBag {
    fn add(&self, resource: DisposableRef) -> bool {
        DisposeBag::add(self, resource)
    }

    fn remove(&self, resource: &DisposableRef) -> bool {
        DisposeBag::remove(self, resource)
    }

    fn delete(&self, resource: &DisposableRef) -> bool {
        DisposeBag::delete(self, resource)
    }
}

/// Builder for [`DisposeBag`].
///
/// The default event is read in [`build`](Self::build), not when the builder
/// is created.
#[must_use]
pub struct DisposeBagBuilder {
    owner: Arc<dyn LifecycleOwner>,
    event: Option<DisposeEvent>,
    resources: Vec<DisposableRef>,
}

impl fmt::Debug for DisposeBagBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposeBagBuilder")
            .field("event", &self.event)
            .field("resources", &self.resources.len())
            .finish_non_exhaustive()
    }
}

impl DisposeBagBuilder {
    /// Dispose on `event` instead of the default.
    pub fn event(mut self, event: DisposeEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Start with `resource` in the bag.
    pub fn resource(mut self, resource: DisposableRef) -> Self {
        self.resources.push(resource);
        self
    }

    /// Start with every element of `resources` in the bag, in order.
    pub fn resources(mut self, resources: impl IntoIterator<Item = DisposableRef>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Register with the owner and return the bag.
    pub fn build(self) -> DisposeBag {
        let event = self.event.unwrap_or_else(plugins::default_dispose_event);
        DisposeBag::bind(self.owner, self.resources, event)
    }
}
