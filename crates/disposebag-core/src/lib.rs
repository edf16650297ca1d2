#![forbid(unsafe_code)]

//! Core: lifecycle model, observer plumbing, and disposable primitives.
//!
//! # Role in disposebag
//! `disposebag-core` owns the two capabilities the bag consumes: a
//! lifecycle owner that notifies observers of transition events, and a
//! cancelable resource that can be disposed exactly once. The `disposebag`
//! crate builds the bag and the direct attachment helpers on top of these.
//!
//! # Primary responsibilities
//! - **Lifecycle model**: [`LifecycleState`], [`LifecycleEvent`], and the
//!   narrower [`DisposeEvent`] a bag can be configured with.
//! - **Observers**: [`LifecycleOwner`] / [`LifecycleObserver`] with explicit
//!   [`ObserverId`] registration handles.
//! - **Reference host**: [`LifecycleRegistry`], a thread-safe owner for hosts
//!   without their own lifecycle machinery.
//! - **Disposables**: [`Disposable`], [`CompositeDisposable`], and the small
//!   constructors in [`disposables`].

pub mod composite;
pub mod disposable;
pub mod lifecycle;
pub mod observer;
pub mod registry;

pub use composite::CompositeDisposable;
pub use disposable::{
    ActionDisposable, BooleanDisposable, Disposable, DisposableContainer, DisposableRef,
    disposables, same_resource,
};
pub use lifecycle::{DisposeEvent, LifecycleEvent, LifecycleState, ParseDisposeEventError};
pub use observer::{LifecycleObserver, LifecycleOwner, ObserverId};
pub use registry::{LifecycleError, LifecycleRegistry};
