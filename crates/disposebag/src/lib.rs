#![forbid(unsafe_code)]

//! Dispose cancelable resources automatically on lifecycle events.
//!
//! # Role
//! A screen, component, or session has a lifecycle; the work it starts
//! (subscriptions, timers, requests) should stop when that lifecycle ends.
//! `disposebag` binds the two together:
//!
//! - **[`DisposeBag`]**: holds any number of resources and disposes all of
//!   them when its owner emits the configured event, or when asked to.
//! - **[`attach`]**: binds a single resource to an owner without a bag.
//! - **[`plugins`]**: the process-wide default event, `Destroy` unless
//!   configured otherwise.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use disposebag::{DisposableExt, DisposeBag, LifecycleEvent, LifecycleRegistry, LifecycleState};
//! use disposebag::{BooleanDisposable, Disposable};
//!
//! let owner = Arc::new(LifecycleRegistry::new());
//! owner.mark_state(LifecycleState::Created).unwrap();
//! let bag = DisposeBag::new(&owner);
//!
//! let work = Arc::new(BooleanDisposable::new());
//! work.clone().disposed_by(&bag);
//!
//! owner.handle_lifecycle_event(LifecycleEvent::Destroy).unwrap();
//! assert!(work.is_disposed());
//! ```
//!
//! The lifecycle model and disposable primitives come from
//! `disposebag-core` and are re-exported here.

pub mod attach;
pub mod bag;
pub mod error;
pub mod plugins;

pub use attach::{DisposableExt, DisposableRefExt, attach, attach_default};
pub use bag::{DisposeBag, DisposeBagBuilder};
pub use error::BagError;
pub use plugins::{default_dispose_event, reset_default_dispose_event, set_default_dispose_event};

pub use disposebag_core::{
    ActionDisposable, BooleanDisposable, CompositeDisposable, Disposable, DisposableContainer,
    DisposableRef, DisposeEvent, LifecycleError, LifecycleEvent, LifecycleObserver,
    LifecycleOwner, LifecycleRegistry, LifecycleState, ObserverId, ParseDisposeEventError,
    disposables, same_resource,
};
